//! # Client Records
//!
//! The value type stored by the directory and the snapshot document
//! format produced by the upstream integration pipeline.

mod record;
mod snapshot;

pub use record::{ClientId, ClientRecord};
pub use snapshot::{parse_snapshot, SnapshotSummary};
