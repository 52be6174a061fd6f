#![allow(clippy::collapsible_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod reconciler;
pub mod ui;

// Re-export commonly used types outside of crate
pub use app::App;
pub use domain::{AssetId, DisplayPrice, PriceSource};
pub use reconciler::PriceReconciler;

// CLI argument parsing
use clap::Parser;

/// Upper bound for `--retries`.
pub const MAX_RETRIES: i64 = 100;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show snapshot prices only; do not open the live price stream
    #[arg(long, default_value_t = false)]
    pub no_stream: bool,

    /// Automatic retries per snapshot fetch, on top of the first attempt
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=MAX_RETRIES))]
    pub retries: Option<u32>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}
