use crate::domain::AssetId;

/// Lifecycle of the push-based source. Never reconnects on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    /// Started with the live feed turned off.
    Disabled,
    #[default]
    Connecting,
    Open,
    Closed,
}

impl StreamStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Connecting => "connecting",
            Self::Open => "live",
            Self::Closed => "closed",
        }
    }
}

/// Messages the stream worker hands to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Status(StreamStatus),
    Prices(Vec<(AssetId, f64)>),
}
