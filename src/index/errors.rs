//! # Index Errors

use thiserror::Error;

use crate::monitor::ErrorKind;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index errors
///
/// Every index operation is in-memory, so the only way one can fail is a
/// writer having panicked while holding the index lock.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Client index lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl ErrorKind for IndexError {
    fn kind(&self) -> &'static str {
        match self {
            IndexError::LockPoisoned(_) => "lock_poisoned",
        }
    }
}
