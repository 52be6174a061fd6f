use chrono::{DateTime, Local};

/// Lifecycle of the pull-based source. Independent of the stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SnapshotState {
    #[default]
    NotStarted,
    Loading {
        started_at: DateTime<Local>,
    },
    Ready,
    /// All attempts of the last cycle failed. Holds the final error.
    Failed {
        error: String,
    },
}

impl SnapshotState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
