//! Invocation Monitor
//!
//! Explicit wrapper around every request facade call:
//!
//! 1. Count the request (global and per operation) before it runs
//! 2. On failure, count the error tagged with operation and error kind
//!    before the error reaches the caller
//! 3. Record latency when the call ends, whatever the outcome
//!
//! # Usage
//!
//! ```ignore
//! let registry = Arc::new(MetricsRegistry::new());
//! let monitor = InvocationMonitor::new(registry.clone());
//!
//! let found = monitor.observe("getClientById", || index.get_by_id(42))?;
//! ```

mod invocation;
mod metrics;
mod recorder;

pub use invocation::{InvocationMonitor, PANIC_KIND};
pub use metrics::{HistogramBucket, LatencySnapshot, MetricsRegistry, MetricsSnapshot, LATENCY_BUCKETS_MS};
pub use recorder::{ErrorKind, MetricsRecorder, NoOpMetrics};
