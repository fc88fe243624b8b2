//! Metrics collector seam

use std::time::Duration;

/// Sink for per-invocation metrics.
///
/// Implementations must never fail or panic; metrics are best-effort.
pub trait MetricsRecorder: Send + Sync {
    /// Count one invocation of `operation` (also counts toward the total)
    fn increment_requests(&self, operation: &str);

    /// Count one failed invocation of `operation` with the given kind
    fn increment_errors(&self, operation: &str, kind: &str);

    /// Record how long one invocation of `operation` took
    fn record_latency(&self, operation: &str, elapsed: Duration);
}

/// Recorder that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn increment_requests(&self, _: &str) {}
    fn increment_errors(&self, _: &str, _: &str) {}
    fn record_latency(&self, _: &str, _: Duration) {}
}

/// Errors that can name their own kind for metric tags.
///
/// Kinds are stable snake_case strings; they become label values.
pub trait ErrorKind {
    fn kind(&self) -> &'static str;
}
