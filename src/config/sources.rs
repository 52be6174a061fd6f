/// Retry budget for the snapshot fetch. `retries` counts the extra attempts
/// after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Total number of attempts, first call included.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based), doubling each time.
    pub fn backoff_ms(&self, retry: u32) -> u64 {
        let factor = 1u64 << retry.saturating_sub(1).min(31);
        self.initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms)
    }

    pub fn with_retries(self, retries: u32) -> Self {
        Self { retries, ..self }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        SOURCES.snapshot.retry
    }
}

/// REST snapshot endpoint (CoinGecko `simple/price`).
pub struct SnapshotConfig {
    pub base_url: &'static str,
    pub vs_currency: &'static str,
    pub timeout_ms: u64,
    pub retry: RetryPolicy,
}

/// Live price socket (CoinCap).
pub struct StreamConfig {
    pub base_url: &'static str,
}

pub struct SourcesConfig {
    pub snapshot: SnapshotConfig,
    pub stream: StreamConfig,
}

pub const SOURCES: SourcesConfig = SourcesConfig {
    snapshot: SnapshotConfig {
        base_url: "https://api.coingecko.com/api/v3/simple/price",
        vs_currency: "usd",
        timeout_ms: 10_000,
        retry: RetryPolicy {
            retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000, // 30 seconds
        },
    },
    stream: StreamConfig {
        base_url: "wss://ws.coincap.io/prices?assets=",
    },
};

pub const USER_AGENT: &str = concat!("crypto-tracker/", env!("CARGO_PKG_VERSION"));
