//! # Request Facade Errors

use thiserror::Error;

use crate::index::IndexError;
use crate::monitor::ErrorKind;

/// Result type for facade operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Facade errors.
///
/// A lookup miss is not an error; it is an `Ok(None)` or `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ErrorKind for ServiceError {
    fn kind(&self) -> &'static str {
        match self {
            ServiceError::Index(inner) => inner.kind(),
        }
    }
}

impl ServiceError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Index(_) => 500,
        }
    }
}
