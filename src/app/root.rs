use {
    eframe::{
        Frame,
        egui::{Context, Key, Visuals},
    },
    std::{
        sync::{
            Arc,
            mpsc::{self, Receiver, Sender},
        },
        time::Duration,
    },
};

use crate::{
    Cli,
    app::DashboardState,
    config::{DF, RetryPolicy},
    data::{
        CoinGeckoProvider, PriceStreamHandle, RepaintSignal, SnapshotProvider,
        spawn_snapshot_fetch,
    },
    domain::AssetId,
    reconciler::{PriceReconciler, SnapshotPriceTable, StreamEvent, StreamStatus},
    ui::UI_CONFIG,
};

type SnapshotResult = anyhow::Result<SnapshotPriceTable>;

/// Owns every piece of mutable view state. Background workers only talk to
/// it through the two channels drained at the top of each frame.
pub struct App {
    pub(crate) dashboard: DashboardState,
    pub(crate) reconciler: PriceReconciler,
    provider: Option<Arc<dyn SnapshotProvider>>,
    retry: RetryPolicy,
    snapshot_tx: Sender<SnapshotResult>,
    snapshot_rx: Receiver<SnapshotResult>,
    stream_rx: Option<Receiver<StreamEvent>>,
    repaint: RepaintSignal,
    // Dropped with the app: closes the socket and joins the worker.
    stream: Option<PriceStreamHandle>,
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let provider: Option<Arc<dyn SnapshotProvider>> = match CoinGeckoProvider::new() {
            Ok(p) => Some(Arc::new(p)),
            Err(e) => {
                log::error!("Snapshot source unavailable: {:#}", e);
                None
            }
        };
        let retry = match args.retries {
            Some(n) => RetryPolicy::default().with_retries(n),
            None => RetryPolicy::default(),
        };

        let mut app = Self::with_provider(provider, retry);
        app.repaint = RepaintSignal::new(&cc.egui_ctx);
        if args.no_stream {
            log::info!("Live price stream disabled (--no-stream)");
            app.reconciler = PriceReconciler::with_stream_disabled();
        } else {
            app.open_stream();
        }
        app.request_snapshot();
        app
    }

    /// Builds the app with no stream and no fetch started.
    pub(crate) fn with_provider(
        provider: Option<Arc<dyn SnapshotProvider>>,
        retry: RetryPolicy,
    ) -> Self {
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        Self {
            dashboard: DashboardState::default(),
            reconciler: PriceReconciler::new(),
            provider,
            retry,
            snapshot_tx,
            snapshot_rx,
            stream_rx: None,
            repaint: RepaintSignal::default(),
            stream: None,
        }
    }

    fn open_stream(&mut self) {
        let (tx, rx) = mpsc::channel();
        match PriceStreamHandle::open(&AssetId::all(), tx, self.repaint.clone()) {
            Ok(handle) => {
                self.stream = Some(handle);
                self.stream_rx = Some(rx);
            }
            Err(e) => {
                log::error!("Failed to open price stream: {:#}", e);
                self.reconciler
                    .apply_stream_event(StreamEvent::Status(StreamStatus::Closed));
            }
        }
    }

    /// Starts a fetch cycle unless one is already running.
    pub(crate) fn request_snapshot(&mut self) {
        if !self.reconciler.begin_snapshot() {
            if DF.log_snapshot {
                log::info!("Refresh ignored: snapshot already in flight");
            }
            return;
        }

        let Some(provider) = self.provider.clone() else {
            self.reconciler
                .finish_snapshot(Err(anyhow::anyhow!("no HTTP client available")));
            return;
        };

        if DF.log_snapshot {
            log::info!(
                "Fetching snapshot ({} attempts max)",
                self.retry.attempts()
            );
        }
        if let Err(e) = spawn_snapshot_fetch(
            provider,
            self.retry,
            self.snapshot_tx.clone(),
            self.repaint.clone(),
        ) {
            self.reconciler.finish_snapshot(Err(e));
        }
    }

    pub(crate) fn stream_running(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_running())
    }

    /// Applies everything the workers sent since the last frame, in order.
    pub(crate) fn drain_sources(&mut self) {
        while let Ok(result) = self.snapshot_rx.try_recv() {
            self.reconciler.finish_snapshot(result);
        }
        if let Some(rx) = &self.stream_rx {
            while let Ok(event) = rx.try_recv() {
                self.reconciler.apply_stream_event(event);
            }
        }
    }

    pub(crate) fn handle_global_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            // If the user typing in text box, don't trigger global hotkeys.
            return;
        }
        if ctx.input(|i| i.key_pressed(Key::F5)) {
            self.request_snapshot();
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        self.drain_sources();
        self.handle_global_shortcuts(ctx);

        self.render_top_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
        self.render_asset_modal(ctx);

        // Workers wake the UI on every send; this only keeps idle frames ticking.
        ctx.request_repaint_after(Duration::from_millis(UI_CONFIG.repaint_interval_ms));
    }
}

fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.modal;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    ctx.set_visuals(visuals);
    ctx.style_mut(|s| s.interaction.selectable_labels = false);
}
