use {
    crate::{
        domain::PriceSource,
        reconciler::StreamStatus,
        ui::UI_CONFIG,
    },
    eframe::egui::{Color32, RichText},
};

pub(crate) fn stream_status_color(status: StreamStatus) -> Color32 {
    match status {
        StreamStatus::Open => UI_CONFIG.colors.live,
        StreamStatus::Connecting => UI_CONFIG.colors.snapshot,
        StreamStatus::Closed => UI_CONFIG.colors.error,
        StreamStatus::Disabled => UI_CONFIG.colors.subdued,
    }
}

pub(crate) fn price_source_color(source: Option<PriceSource>) -> Color32 {
    match source {
        Some(PriceSource::Live) => UI_CONFIG.colors.live,
        Some(PriceSource::Snapshot) => UI_CONFIG.colors.snapshot,
        None => UI_CONFIG.colors.subdued,
    }
}

pub(crate) fn price_text(text: impl Into<String>, size: f32) -> RichText {
    RichText::new(text.into())
        .monospace()
        .size(size)
        .color(UI_CONFIG.colors.price)
}
