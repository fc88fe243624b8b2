//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit. `main` prints the
//! stable code before the message.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Stable machine-readable failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    ConfigError,
    IoError,
    InvalidSnapshot,
    BootFailed,
}

impl CliErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigError => "CLIENTDIR_CLI_CONFIG_ERROR",
            Self::IoError => "CLIENTDIR_CLI_IO_ERROR",
            Self::InvalidSnapshot => "CLIENTDIR_CLI_INVALID_SNAPSHOT",
            Self::BootFailed => "CLIENTDIR_CLI_BOOT_FAILED",
        }
    }
}

impl fmt::Display for CliErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read {path}: {source}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a client snapshot: {source}")]
    InvalidSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode inspect report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("cannot start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("HTTP server stopped: {0}")]
    Serve(#[source] io::Error),
}

impl CliError {
    pub fn code(&self) -> CliErrorCode {
        match self {
            Self::Config(_) => CliErrorCode::ConfigError,
            Self::ReadSnapshot { .. } | Self::Report(_) => CliErrorCode::IoError,
            Self::InvalidSnapshot { .. } => CliErrorCode::InvalidSnapshot,
            Self::Runtime(_) | Self::Serve(_) => CliErrorCode::BootFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_error_keeps_message() {
        let err = CliError::from(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert_eq!(
            format!("{}: {}", err.code(), err),
            "CLIENTDIR_CLI_CONFIG_ERROR: Invalid configuration: poll_interval_ms must be > 0"
        );
    }

    #[test]
    fn test_io_failures_keep_source() {
        let err = CliError::ReadSnapshot {
            path: PathBuf::from("/drops/clients_1.json"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.code(), CliErrorCode::IoError);
        assert!(err.to_string().starts_with("cannot read /drops/clients_1.json"));
        assert!(err.source().is_some());

        let err = CliError::Serve(io::Error::from(io::ErrorKind::AddrInUse));
        assert_eq!(err.code().as_str(), "CLIENTDIR_CLI_BOOT_FAILED");
    }
}
