mod price_stream;
mod repaint;
mod snapshot;

pub use {
    price_stream::PriceStreamHandle,
    repaint::RepaintSignal,
    snapshot::{CoinGeckoProvider, SnapshotProvider, fetch_with_retry, spawn_snapshot_fetch},
};
