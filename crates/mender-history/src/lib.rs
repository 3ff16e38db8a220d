//! Recoverable, time-named snapshot history for one tracked file

pub mod history;


pub use history::{HISTORY_DIR, SNAPSHOT_ID_FORMAT, Snapshot, SnapshotHistory};
