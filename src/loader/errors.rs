//! # Snapshot Loader Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::index::IndexError;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Snapshot loader errors.
///
/// None of these are fatal to the process. A failed file is left
/// unapplied and retried on the next poll.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Watched directory {path} is unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Snapshot poll task failed: {0}")]
    TaskFailed(String),
}

impl LoaderError {
    /// The snapshot file involved, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            LoaderError::DirectoryUnavailable { path, .. }
            | LoaderError::Io { path, .. }
            | LoaderError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            LoaderError::InvalidPattern { .. } => 400,
            LoaderError::Parse { .. } => 422,
            LoaderError::DirectoryUnavailable { .. } => 503,
            LoaderError::Io { .. } | LoaderError::Index(_) | LoaderError::TaskFailed(_) => 500,
        }
    }
}
