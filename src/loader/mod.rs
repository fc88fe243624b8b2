//! Snapshot Loader subsystem
//!
//! Keeps the client index in step with the JSON snapshot files an
//! external pipeline drops into a watched directory.
//!
//! # Design
//!
//! - Polling, newest modification time wins; the pipeline gives no other
//!   completion signal, so staleness is bounded by the poll interval
//! - A file is "applied" only after it parsed and was swapped in
//! - A failing file is retried every poll until it loads or a newer file
//!   supersedes it
//! - The last applied reference is process-local and not persisted

mod errors;
mod pattern;
mod status;
mod watcher;

pub use errors::{LoaderError, LoaderResult};
pub use pattern::FilePattern;
pub use status::{AppliedSnapshot, PollOutcome, SnapshotCandidate, SnapshotStatus};
pub use watcher::{LoaderConfig, SnapshotLoader};
