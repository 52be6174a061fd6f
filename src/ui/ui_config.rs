use eframe::egui::{Color32, CornerRadius, Frame, Margin, Stroke};

pub use crate::ui::ui_text::UI_TEXT;

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub card: Color32,
    pub card_border: Color32,
    pub modal: Color32,
    pub price: Color32,
    pub live: Color32,
    pub snapshot: Color32,
    pub subdued: Color32,
    pub error: Color32,
    pub error_fill: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub card_width: f32,
    pub repaint_interval_ms: u64,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::WHITE,
        central_panel: Color32::from_rgb(30, 41, 59),
        side_panel: Color32::from_rgb(15, 23, 42),
        card: Color32::from_rgb(51, 65, 85),
        card_border: Color32::from_rgb(71, 85, 105),
        modal: Color32::from_rgb(30, 41, 59),
        price: Color32::from_rgb(203, 213, 225),
        live: Color32::from_rgb(74, 222, 128),
        snapshot: Color32::from_rgb(129, 140, 248),
        subdued: Color32::from_rgb(148, 163, 184),
        error: Color32::from_rgb(248, 113, 113),
        error_fill: Color32::from_rgb(69, 26, 26),
    },
    card_width: 220.0,
    repaint_interval_ms: 1_000,
};

impl UiConfig {
    /// Frame for the Top Toolbar (Standard padding)
    pub fn top_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(12),
            ..Default::default()
        }
    }

    /// Frame for Bottom Status bar (Tighter vertical padding)
    pub fn bottom_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::symmetric(8, 4), // Tighter vertically
            ..Default::default()
        }
    }

    pub fn central_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.central_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(16),
            ..Default::default()
        }
    }

    pub fn card_frame(&self) -> Frame {
        Frame {
            fill: self.colors.card,
            stroke: Stroke::new(1.0, self.colors.card_border),
            inner_margin: Margin::same(16),
            corner_radius: CornerRadius::same(10),
            ..Default::default()
        }
    }

    pub fn error_banner_frame(&self) -> Frame {
        Frame {
            fill: self.colors.error_fill,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(12),
            corner_radius: CornerRadius::same(8),
            ..Default::default()
        }
    }
}
