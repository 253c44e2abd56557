//! Pipeline stages for the watcher.
//!
//! - `build_snapshot`: join catalog offers with availability records
//! - `calculate_diff`: compare two snapshots into change events
//! - `HttpSource`: fetch both upstream sources into a snapshot
//! - `Poller`: the long-running fetch, diff and notify loop

pub mod diff;
pub mod poll;
pub mod snapshot;
pub mod source;

pub use diff::{DiffResult, calculate_diff};
pub use poll::Poller;
pub use snapshot::build_snapshot;
pub use source::{HttpSource, SnapshotSource};
