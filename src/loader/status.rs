//! Snapshot identity and loader status

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::index::ReloadSummary;

/// The newest matching file found by a directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

impl SnapshotCandidate {
    /// Whether this candidate is the file that was last applied.
    ///
    /// Identity is path plus modification time; contents are not hashed.
    /// A file rewritten in place under the same name is a new candidate.
    pub fn is_same_file(&self, applied: &AppliedSnapshot) -> bool {
        self.path == applied.path && self.modified == applied.modified
    }
}

/// The snapshot currently reflected by the index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedSnapshot {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub applied_at: DateTime<Utc>,
    pub reload: ReloadSummary,
}

impl AppliedSnapshot {
    pub(crate) fn new(candidate: SnapshotCandidate, reload: ReloadSummary) -> Self {
        Self {
            path: candidate.path,
            file_name: candidate.file_name,
            size_bytes: candidate.size_bytes,
            modified: candidate.modified,
            applied_at: Utc::now(),
            reload,
        }
    }
}

/// What the loader has applied so far
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SnapshotStatus {
    NothingLoaded,
    Loaded(AppliedSnapshot),
}

impl SnapshotStatus {
    /// The applied snapshot, if any
    pub fn applied(&self) -> Option<&AppliedSnapshot> {
        match self {
            SnapshotStatus::NothingLoaded => None,
            SnapshotStatus::Loaded(applied) => Some(applied),
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotStatus::NothingLoaded => write!(f, "No file processed yet"),
            SnapshotStatus::Loaded(applied) => write!(
                f,
                "File: {}, Size: {} bytes, Last modified: {}",
                applied.file_name,
                applied.size_bytes,
                applied.modified.to_rfc3339()
            ),
        }
    }
}

/// Result of one scheduled poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No file in the directory matches the pattern
    NoCandidate,
    /// The newest file is the one already applied
    Unchanged,
    /// A new snapshot was parsed and swapped in
    Applied(AppliedSnapshot),
}
