//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - Synchronous, no buffering
//! - TRACE/INFO/WARN go to stdout, ERROR to stderr

use std::fmt;
use std::io::{self, Write};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn to_stderr(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        if severity.to_stderr() {
            Self::emit(&line, &mut io::stderr());
        } else {
            Self::emit(&line, &mut io::stdout());
        }
    }

    /// Render one log line, newline included.
    ///
    /// A field named `event` or `severity` cannot shadow the header keys.
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<_> = fields
            .iter()
            .filter(|(key, _)| *key != "event" && *key != "severity")
            .collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = String::with_capacity(128);
        line.push('{');
        Self::push_pair(&mut line, "event", event);
        line.push(',');
        Self::push_pair(&mut line, "severity", severity.as_str());
        for (key, value) in sorted {
            line.push(',');
            Self::push_pair(&mut line, key, value);
        }
        line.push_str("}\n");
        line
    }

    fn push_pair(line: &mut String, key: &str, value: &str) {
        line.push_str(&Value::from(key).to_string());
        line.push(':');
        line.push_str(&Value::from(value).to_string());
    }

    /// Write atomically (one syscall); logging failures are swallowed
    fn emit<W: Write>(line: &str, writer: &mut W) {
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}
