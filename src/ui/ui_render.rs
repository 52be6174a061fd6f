use eframe::egui::{
    Align, Button, CentralPanel, Context, CursorIcon, Id, Layout, Modal, RichText, ScrollArea,
    Sense, TextEdit, TopBottomPanel, Ui,
};

use crate::{
    app::App,
    domain::{AssetId, PriceSource},
    reconciler::PriceReconciler,
    ui::{
        UI_CONFIG, UI_TEXT,
        styles::{price_source_color, price_text, stream_status_color},
    },
};

const TIME_FORMAT: &str = "%H:%M:%S";

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.top_panel_frame();
        let loading = self.reconciler.snapshot_state().is_loading();
        let mut refresh_clicked = false;

        TopBottomPanel::top("top_toolbar")
            .frame(frame)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        RichText::new(&UI_TEXT.app_title)
                            .size(28.0)
                            .strong()
                            .color(UI_CONFIG.colors.heading),
                    );
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let mut query = self.dashboard.search().to_owned();
                    let button_width = 90.0;
                    let search = ui.add(
                        TextEdit::singleline(&mut query)
                            .hint_text(UI_TEXT.search_hint.as_str())
                            .desired_width(ui.available_width() - button_width),
                    );
                    if search.changed() {
                        self.dashboard.set_search(query);
                    }

                    let hover = if loading {
                        &UI_TEXT.hover_refresh_busy
                    } else {
                        &UI_TEXT.hover_refresh
                    };
                    let refresh = ui
                        .add_enabled(!loading, Button::new(UI_TEXT.button_refresh.as_str()))
                        .on_hover_text(hover.as_str())
                        .on_disabled_hover_text(hover.as_str());
                    if refresh.clicked() {
                        refresh_clicked = true;
                    }
                });
            });

        if refresh_clicked {
            self.request_snapshot();
        }
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.central_panel_frame();
        let assets = self.dashboard.filtered_assets();
        let mut clicked = None;

        CentralPanel::default().frame(frame).show(ctx, |ui| {
            let state = self.reconciler.snapshot_state();
            if state.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new(&UI_TEXT.loading).color(UI_CONFIG.colors.subdued));
                });
                ui.add_space(8.0);
            }
            if let Some(error) = state.error() {
                render_error_banner(ui, error);
                ui.add_space(8.0);
            }

            if assets.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(RichText::new(&UI_TEXT.no_matches).color(UI_CONFIG.colors.subdued));
                });
                return;
            }

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = [16.0, 16.0].into();
                    for &asset in &assets {
                        if render_asset_card(ui, asset, &self.reconciler) {
                            clicked = Some(asset);
                        }
                    }
                });
            });
        });

        if let Some(asset) = clicked {
            self.dashboard.select(asset);
        }
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.bottom_panel_frame();
        TopBottomPanel::bottom("status_panel")
            .frame(frame)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let status = self.reconciler.stream_status();
                    ui.label(RichText::new(&UI_TEXT.label_stream).small());
                    ui.label(
                        RichText::new(status.label())
                            .small()
                            .strong()
                            .color(stream_status_color(status)),
                    );
                    if self.stream_running() {
                        ui.label(
                            RichText::new(format!(
                                "({} {})",
                                self.reconciler.stream().updates_applied(),
                                UI_TEXT.label_ticks
                            ))
                            .small()
                            .color(UI_CONFIG.colors.subdued),
                        );
                    }

                    ui.separator();

                    ui.label(RichText::new(&UI_TEXT.label_snapshot).small());
                    let fetched = self
                        .reconciler
                        .snapshot()
                        .map(|t| t.fetched_at().format(TIME_FORMAT).to_string())
                        .unwrap_or_else(|| UI_TEXT.snapshot_never.clone());
                    ui.label(RichText::new(fetched).small().color(UI_CONFIG.colors.subdued));
                });
            });
    }

    pub(crate) fn render_asset_modal(&mut self, ctx: &Context) {
        let Some(asset) = self.dashboard.selected() else {
            return;
        };
        let reconciler = &self.reconciler;

        let response = Modal::new(Id::new("asset_detail_modal")).show(ctx, |ui| {
            ui.set_width(320.0);
            let mut close_clicked = false;
            ui.vertical_centered(|ui| {
                ui.heading(
                    RichText::new(asset.display_name())
                        .size(24.0)
                        .strong()
                        .color(UI_CONFIG.colors.heading),
                );
                ui.label(RichText::new(asset.ticker()).color(UI_CONFIG.colors.subdued));
                ui.add_space(12.0);

                let price = reconciler.display_price(asset);
                ui.label(price_text(format!("${}", price), 20.0));
                ui.add_space(8.0);

                let source = match price.source() {
                    Some(PriceSource::Live) => &UI_TEXT.source_live,
                    Some(PriceSource::Snapshot) => &UI_TEXT.source_snapshot,
                    None => &UI_TEXT.source_none,
                };
                ui.label(
                    RichText::new(format!("{}: {}", UI_TEXT.label_source, source))
                        .small()
                        .color(price_source_color(price.source())),
                );
                if let Some(at) = reconciler.last_updated(asset) {
                    ui.label(
                        RichText::new(format!(
                            "{}: {}",
                            UI_TEXT.label_updated,
                            at.format(TIME_FORMAT)
                        ))
                        .small()
                        .color(UI_CONFIG.colors.subdued),
                    );
                }

                ui.add_space(16.0);
                if ui.button(UI_TEXT.button_close.as_str()).clicked() {
                    close_clicked = true;
                }
            });
            close_clicked
        });

        // Backdrop click and Escape both count as a close.
        if response.inner || response.should_close() {
            self.dashboard.close_modal();
        }
    }
}

fn render_error_banner(ui: &mut Ui, error: &str) {
    UI_CONFIG.error_banner_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&UI_TEXT.error_fetch).color(UI_CONFIG.colors.error))
                .on_hover_text(error);
        });
    });
}

/// Returns true when the card was clicked.
fn render_asset_card(ui: &mut Ui, asset: AssetId, reconciler: &PriceReconciler) -> bool {
    let price = reconciler.display_price(asset);
    let response = UI_CONFIG
        .card_frame()
        .show(ui, |ui| {
            ui.set_width(UI_CONFIG.card_width);
            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(asset.display_name())
                            .size(18.0)
                            .strong()
                            .color(UI_CONFIG.colors.heading),
                    );
                    ui.label(
                        RichText::new(asset.ticker())
                            .small()
                            .color(price_source_color(price.source())),
                    );
                });
                ui.add_space(6.0);
                ui.label(price_text(format!("${}", price), 16.0));
            });
        })
        .response
        .interact(Sense::click())
        .on_hover_cursor(CursorIcon::PointingHand);

    response.clicked()
}
