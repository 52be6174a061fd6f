use {
    crate::domain::AssetId,
    chrono::{DateTime, Local},
    std::collections::BTreeMap,
};

/// One complete pull of every tracked price. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPriceTable {
    prices: BTreeMap<AssetId, f64>,
    fetched_at: DateTime<Local>,
}

impl SnapshotPriceTable {
    pub fn new(prices: BTreeMap<AssetId, f64>, fetched_at: DateTime<Local>) -> Self {
        Self { prices, fetched_at }
    }

    pub fn get(&self, asset: AssetId) -> Option<f64> {
        self.prices.get(&asset).copied()
    }

    pub fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Latest streamed price for one asset. `seq` is the local receive order:
/// the feed itself carries no sequence numbers, so this cannot detect
/// out-of-order delivery, only record what arrived when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamQuote {
    pub price: f64,
    pub received_at: DateTime<Local>,
    pub seq: u64,
}

/// Per-asset live prices, accumulated for the whole session.
#[derive(Debug, Clone, Default)]
pub struct StreamPriceTable {
    quotes: BTreeMap<AssetId, StreamQuote>,
    next_seq: u64,
}

impl StreamPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites only the assets named in `updates`; last received wins.
    pub fn apply(&mut self, updates: &[(AssetId, f64)], received_at: DateTime<Local>) {
        for &(asset, price) in updates {
            self.next_seq += 1;
            self.quotes.insert(
                asset,
                StreamQuote {
                    price,
                    received_at,
                    seq: self.next_seq,
                },
            );
        }
    }

    pub fn get(&self, asset: AssetId) -> Option<&StreamQuote> {
        self.quotes.get(&asset)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Total pairs applied this session.
    pub fn updates_applied(&self) -> u64 {
        self.next_seq
    }
}
