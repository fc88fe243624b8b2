//! Snapshot document parsing
//!
//! A snapshot is a JSON array of client objects describing the complete
//! client set at the time the pipeline exported it.

use serde::Serialize;

use super::record::ClientRecord;

/// Parse a snapshot document.
///
/// Anything other than a JSON array of objects is rejected as a whole;
/// there is no partial acceptance of a malformed document.
pub fn parse_snapshot(bytes: &[u8]) -> serde_json::Result<Vec<ClientRecord>> {
    serde_json::from_slice(bytes)
}

/// Shape of a parsed snapshot, before it reaches the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    /// Entries in the document
    pub total: usize,
    /// Entries without an id (never indexed)
    pub without_id: usize,
    /// Indexable entries without a usable email
    pub without_email: usize,
}

impl SnapshotSummary {
    /// Summarize a parsed record list
    pub fn of(records: &[ClientRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut summary, record| {
                if record.id.is_none() {
                    summary.without_id += 1;
                } else if record.normalized_email().is_none() {
                    summary.without_email += 1;
                }
                summary
            },
        )
    }

    /// Entries that will be retrievable by id
    pub fn indexable(&self) -> usize {
        self.total - self.without_id
    }
}
