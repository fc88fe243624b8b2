//! Observability subsystem
//!
//! Structured JSON logging and typed lifecycle events. Request metrics
//! live in [`crate::monitor`].
//!
//! # Usage
//!
//! ```ignore
//! use clientdir::observability::{log_event, Event};
//!
//! log_event(Event::SnapshotApplied, &[("file", "clients_0601.json"), ("records", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
