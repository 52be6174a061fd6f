//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Emit verbose logging for live price stream connections and ticks.
    pub log_price_stream_updates: bool,

    /// Log every snapshot attempt, not just the final outcome.
    pub log_snapshot: bool,

    /// Anything about selecting / closing the detail modal
    pub log_selection: bool,
}

pub const DF: LogFlags = LogFlags {
    log_price_stream_updates: false,
    log_snapshot: true,
    log_selection: false,
};
