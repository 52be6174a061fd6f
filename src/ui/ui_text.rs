use std::sync::LazyLock;

pub struct UiText {
    pub app_title: String,

    // --- Top panel ---
    pub search_hint: String,
    pub button_refresh: String,
    pub hover_refresh: String,
    pub hover_refresh_busy: String,

    // --- Central panel ---
    pub loading: String,
    pub error_fetch: String,
    pub no_matches: String,

    // --- Modal ---
    pub button_close: String,
    pub label_source: String,
    pub label_updated: String,
    pub source_live: String,
    pub source_snapshot: String,
    pub source_none: String,

    // --- Status bar ---
    pub label_stream: String,
    pub label_snapshot: String,
    pub label_ticks: String,
    pub snapshot_never: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Crypto Tracker".to_string(),

    search_hint: "Search cryptocurrencies...".to_string(),
    button_refresh: "Refresh".to_string(),
    hover_refresh: "Fetch fresh snapshot prices (F5)".to_string(),
    hover_refresh_busy: "A fetch is already running".to_string(),

    loading: "Fetching prices...".to_string(),
    error_fetch: "Error fetching prices. Please try again.".to_string(),
    no_matches: "No cryptocurrencies match your search.".to_string(),

    button_close: "Close".to_string(),
    label_source: "Source".to_string(),
    label_updated: "Updated".to_string(),
    source_live: "live stream".to_string(),
    source_snapshot: "snapshot".to_string(),
    source_none: "no data yet".to_string(),

    label_stream: "Stream:".to_string(),
    label_snapshot: "Snapshot:".to_string(),
    label_ticks: "ticks".to_string(),
    snapshot_never: "never".to_string(),
});
