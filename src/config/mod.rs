//! Configuration module for the crypto tracker.

mod debug;
mod sources;

pub use debug::DF;
pub use sources::{RetryPolicy, SOURCES, SnapshotConfig, StreamConfig, USER_AGENT};
