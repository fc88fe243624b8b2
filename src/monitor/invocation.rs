//! Per-invocation wrapper

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use super::recorder::{ErrorKind, MetricsRecorder, NoOpMetrics};

/// Error kind recorded for a call that panicked
pub const PANIC_KIND: &str = "panic";

/// Records latency for one invocation when dropped.
///
/// Dropping happens on normal return, on error return, and while
/// unwinding from a panic, so the sample is never lost. A panic raised
/// by the call itself is also counted as an error.
struct LatencyGuard<'a> {
    recorder: &'a dyn MetricsRecorder,
    operation: &'static str,
    started: Instant,
    /// Already unwinding when the call began (e.g. called from a Drop)
    unwinding_at_start: bool,
}

impl<'a> LatencyGuard<'a> {
    fn start(recorder: &'a dyn MetricsRecorder, operation: &'static str) -> Self {
        Self {
            recorder,
            operation,
            started: Instant::now(),
            unwinding_at_start: thread::panicking(),
        }
    }
}

impl Drop for LatencyGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() && !self.unwinding_at_start {
            self.recorder.increment_errors(self.operation, PANIC_KIND);
        }
        self.recorder
            .record_latency(self.operation, self.started.elapsed());
    }
}

/// Wraps operations with request counting, error tagging and timing
#[derive(Clone)]
pub struct InvocationMonitor {
    recorder: Arc<dyn MetricsRecorder>,
}

impl InvocationMonitor {
    pub fn new(recorder: Arc<dyn MetricsRecorder>) -> Self {
        Self { recorder }
    }

    /// Create a monitor that records nothing
    pub fn noop() -> Self {
        Self::new(Arc::new(NoOpMetrics))
    }

    /// Run `call` as one monitored invocation of `operation`.
    ///
    /// The request is counted before `call` runs. An `Err` is counted
    /// under its kind before being handed back, a panic under
    /// [`PANIC_KIND`] before it resumes unwinding. Latency is recorded last.
    pub fn observe<T, E, F>(&self, operation: &'static str, call: F) -> Result<T, E>
    where
        E: ErrorKind,
        F: FnOnce() -> Result<T, E>,
    {
        self.recorder.increment_requests(operation);
        let _latency = LatencyGuard::start(self.recorder.as_ref(), operation);

        let result = call();
        if let Err(err) = &result {
            self.recorder.increment_errors(operation, err.kind());
        }
        result
    }
}

impl std::fmt::Debug for InvocationMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationMonitor").finish_non_exhaustive()
    }
}
