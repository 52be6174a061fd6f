//! Merges the snapshot and stream sources into one display price per asset.

mod snapshot_state;
mod stream_state;
mod tables;

pub use snapshot_state::SnapshotState;
pub use stream_state::{StreamEvent, StreamStatus};
pub use tables::{SnapshotPriceTable, StreamPriceTable, StreamQuote};

use {
    crate::{
        config::DF,
        domain::{AssetId, DisplayPrice, PriceSource},
    },
    chrono::{DateTime, Local},
};

/// Owns both price tables and both source lifecycles. Each table has exactly
/// one writer: snapshot results write the snapshot table, stream events the
/// stream table.
#[derive(Debug, Default)]
pub struct PriceReconciler {
    snapshot: Option<SnapshotPriceTable>,
    snapshot_state: SnapshotState,
    stream: StreamPriceTable,
    stream_status: StreamStatus,
    failed_cycles: u32,
}

impl PriceReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream_disabled() -> Self {
        Self {
            stream_status: StreamStatus::Disabled,
            ..Self::default()
        }
    }

    /// Marks a new fetch cycle as started. Returns false if one is already in
    /// flight, in which case the caller must not launch another.
    pub fn begin_snapshot(&mut self) -> bool {
        if self.snapshot_state.is_loading() {
            return false;
        }
        self.snapshot_state = SnapshotState::Loading {
            started_at: Local::now(),
        };
        true
    }

    /// Applies the outcome of a whole fetch cycle (all retries included).
    /// A failure never touches the stored table.
    pub fn finish_snapshot(&mut self, result: anyhow::Result<SnapshotPriceTable>) {
        if !self.snapshot_state.is_loading() {
            log::warn!("Snapshot result arrived with no fetch in flight; dropped");
            return;
        }
        match result {
            Ok(table) => {
                if DF.log_snapshot {
                    log::info!(
                        "Snapshot ready: {}/{} assets priced",
                        table.len(),
                        AssetId::all().len()
                    );
                }
                self.snapshot = Some(table);
                self.snapshot_state = SnapshotState::Ready;
            }
            Err(e) => {
                self.failed_cycles += 1;
                log::error!("Snapshot fetch failed after retries: {:#}", e);
                self.snapshot_state = SnapshotState::Failed {
                    error: format!("{:#}", e),
                };
            }
        }
    }

    /// The stream message handler: applied in arrival order, no reordering.
    pub fn apply_stream_event(&mut self, event: StreamEvent) {
        self.apply_stream_event_at(event, Local::now());
    }

    pub(crate) fn apply_stream_event_at(&mut self, event: StreamEvent, at: DateTime<Local>) {
        match event {
            StreamEvent::Status(status) => {
                if status != self.stream_status {
                    log::info!(
                        "Price stream {} -> {}",
                        self.stream_status.label(),
                        status.label()
                    );
                }
                self.stream_status = status;
            }
            StreamEvent::Prices(updates) => {
                #[cfg(debug_assertions)]
                if DF.log_price_stream_updates {
                    log::info!("[stream] {:?}", updates);
                }
                self.stream.apply(&updates, at);
            }
        }
    }

    /// Stream beats snapshot; neither gives `Unavailable`.
    pub fn display_price(&self, asset: AssetId) -> DisplayPrice {
        if let Some(quote) = self.stream.get(asset) {
            return DisplayPrice::Available {
                price: quote.price,
                source: PriceSource::Live,
            };
        }
        match self.snapshot.as_ref().and_then(|t| t.get(asset)) {
            Some(price) => DisplayPrice::Available {
                price,
                source: PriceSource::Snapshot,
            },
            None => DisplayPrice::Unavailable,
        }
    }

    /// When the displayed value was last refreshed, from whichever source won.
    pub fn last_updated(&self, asset: AssetId) -> Option<DateTime<Local>> {
        match self.display_price(asset).source()? {
            PriceSource::Live => self.stream.get(asset).map(|q| q.received_at),
            PriceSource::Snapshot => self.snapshot.as_ref().map(|t| t.fetched_at()),
        }
    }

    pub fn snapshot(&self) -> Option<&SnapshotPriceTable> {
        self.snapshot.as_ref()
    }

    pub fn snapshot_state(&self) -> &SnapshotState {
        &self.snapshot_state
    }

    pub fn stream(&self) -> &StreamPriceTable {
        &self.stream
    }

    pub fn stream_status(&self) -> StreamStatus {
        self.stream_status
    }

    /// Number of fetch cycles that ended in failure. One per cycle, however
    /// many attempts it took.
    pub fn failed_cycles(&self) -> u32 {
        self.failed_cycles
    }
}
