//! Observable lifecycle events
//!
//! Events are explicit and typed. Each carries its own severity so call
//! sites cannot log a failure at INFO by accident.

use std::fmt;

use super::logger::Severity;

/// Observable events in the client directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Watched directory was missing and has been created
    DirectoryCreated,
    /// Watched directory cannot be created or read
    DirectoryUnavailable,

    // Snapshot loading
    /// Directory scan begins
    SnapshotScan,
    /// No file matches the pattern
    SnapshotNotFound,
    /// A file newer than the applied one was found
    SnapshotDetected,
    /// A snapshot was parsed and swapped into the index
    SnapshotApplied,
    /// A snapshot could not be read or parsed
    SnapshotFailed,
    /// Operator-requested reload
    ForceReload,

    // Polling task
    /// Poll loop started
    PollerStart,
    /// Poll loop stopped
    PollerStop,

    // Server
    /// HTTP listener bound, serving requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "CLIENTDIR_STARTUP_BEGIN",
            Event::BootComplete => "CLIENTDIR_STARTUP_COMPLETE",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DirectoryCreated => "WATCH_DIR_CREATED",
            Event::DirectoryUnavailable => "WATCH_DIR_UNAVAILABLE",

            Event::SnapshotScan => "SNAPSHOT_SCAN",
            Event::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
            Event::SnapshotDetected => "SNAPSHOT_DETECTED",
            Event::SnapshotApplied => "SNAPSHOT_APPLIED",
            Event::SnapshotFailed => "SNAPSHOT_FAILED",
            Event::ForceReload => "SNAPSHOT_FORCE_RELOAD",

            Event::PollerStart => "POLLER_START",
            Event::PollerStop => "POLLER_STOP",

            Event::Serving => "CLIENTDIR_SERVING",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SnapshotScan | Event::SnapshotNotFound => Severity::Trace,
            Event::DirectoryUnavailable => Severity::Warn,
            Event::SnapshotFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
