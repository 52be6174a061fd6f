use eframe::egui::Context;

/// Wakes the UI after a worker has handed it something to draw.
/// The default signal is detached and does nothing.
#[derive(Clone, Default)]
pub struct RepaintSignal {
    ctx: Option<Context>,
}

impl RepaintSignal {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: Some(ctx.clone()),
        }
    }

    pub fn wake(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}
