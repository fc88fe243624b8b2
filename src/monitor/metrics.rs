//! In-process metrics registry
//!
//! - Counters are monotonic and reset only on process start
//! - Per-operation series are created on first use
//! - Thread-safe; hot counters are atomics, the maps are only written
//!   when a new series appears
//! - A poisoned lock drops the sample instead of failing the call

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::Serialize;

use super::recorder::MetricsRecorder;

/// Upper bounds (inclusive, milliseconds) of the latency histogram
/// buckets. A final overflow bucket catches everything slower.
pub const LATENCY_BUCKETS_MS: [u64; 7] = [1, 5, 10, 50, 100, 500, 1000];

#[derive(Debug, Default, Clone)]
struct LatencyStats {
    count: u64,
    total_micros: u64,
    max_micros: u64,
    buckets: [u64; LATENCY_BUCKETS_MS.len() + 1],
}

impl LatencyStats {
    fn record(&mut self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.count += 1;
        self.total_micros = self.total_micros.saturating_add(micros);
        self.max_micros = self.max_micros.max(micros);

        let slot = LATENCY_BUCKETS_MS
            .iter()
            .position(|bound| micros <= bound * 1000)
            .unwrap_or(LATENCY_BUCKETS_MS.len());
        self.buckets[slot] += 1;
    }

    fn snapshot(&self) -> LatencySnapshot {
        let bounds = LATENCY_BUCKETS_MS.iter().copied().map(Some).chain([None]);
        LatencySnapshot {
            count: self.count,
            total_ms: self.total_micros as f64 / 1000.0,
            max_ms: self.max_micros as f64 / 1000.0,
            buckets: bounds
                .zip(self.buckets.iter())
                .map(|(le_ms, &count)| HistogramBucket { le_ms, count })
                .collect(),
        }
    }
}

/// Metrics registry for request facade invocations
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Every invocation
    requests_total: AtomicU64,
    /// Every failed invocation
    errors_total: AtomicU64,
    /// Invocations per operation
    requests_by_operation: RwLock<HashMap<String, Arc<AtomicU64>>>,
    /// Failures per (operation, error kind)
    errors_by_operation: RwLock<HashMap<(String, String), Arc<AtomicU64>>>,
    /// Latency per operation
    latency: Mutex<HashMap<String, LatencyStats>>,
}

impl MetricsRegistry {
    /// Create a new registry with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the counter stored under `key`
    fn counter<K>(map: &RwLock<HashMap<K, Arc<AtomicU64>>>, key: K) -> Option<Arc<AtomicU64>>
    where
        K: std::hash::Hash + Eq,
    {
        if let Some(counter) = map.read().ok()?.get(&key) {
            return Some(Arc::clone(counter));
        }
        let mut map = map.write().ok()?;
        Some(Arc::clone(map.entry(key).or_default()))
    }

    /// Total invocations
    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Total failed invocations
    pub fn errors_total(&self) -> u64 {
        self.errors_total.load(Ordering::Relaxed)
    }

    /// Invocations of one operation
    pub fn requests_for(&self, operation: &str) -> u64 {
        self.requests_by_operation
            .read()
            .ok()
            .and_then(|map| map.get(operation).map(|c| c.load(Ordering::Relaxed)))
            .unwrap_or(0)
    }

    /// Failures of one operation with one error kind
    pub fn errors_for(&self, operation: &str, kind: &str) -> u64 {
        self.errors_by_operation
            .read()
            .ok()
            .and_then(|map| {
                map.get(&(operation.to_string(), kind.to_string()))
                    .map(|c| c.load(Ordering::Relaxed))
            })
            .unwrap_or(0)
    }

    /// Latency samples recorded for one operation
    pub fn latency_count(&self, operation: &str) -> u64 {
        self.latency
            .lock()
            .ok()
            .and_then(|map| map.get(operation).map(|s| s.count))
            .unwrap_or(0)
    }

    /// Point-in-time copy of every series
    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests_by_operation = self
            .requests_by_operation
            .read()
            .map(|map| {
                map.iter()
                    .map(|(op, c)| (op.clone(), c.load(Ordering::Relaxed)))
                    .collect()
            })
            .unwrap_or_default();

        let mut errors_by_operation: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
        if let Ok(map) = self.errors_by_operation.read() {
            for ((op, kind), counter) in map.iter() {
                errors_by_operation
                    .entry(op.clone())
                    .or_default()
                    .insert(kind.clone(), counter.load(Ordering::Relaxed));
            }
        }

        let latency = self
            .latency
            .lock()
            .map(|map| {
                map.iter()
                    .map(|(op, stats)| (op.clone(), stats.snapshot()))
                    .collect()
            })
            .unwrap_or_default();

        MetricsSnapshot {
            requests_total: self.requests_total(),
            errors_total: self.errors_total(),
            requests_by_operation,
            errors_by_operation,
            latency,
        }
    }
}

impl MetricsRecorder for MetricsRegistry {
    fn increment_requests(&self, operation: &str) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = Self::counter(&self.requests_by_operation, operation.to_string()) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn increment_errors(&self, operation: &str, kind: &str) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
        let key = (operation.to_string(), kind.to_string());
        if let Some(counter) = Self::counter(&self.errors_by_operation, key) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_latency(&self, operation: &str, elapsed: Duration) {
        if let Ok(mut map) = self.latency.lock() {
            map.entry(operation.to_string()).or_default().record(elapsed);
        }
    }
}

/// One histogram bucket; `le_ms: None` is the overflow bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub le_ms: Option<u64>,
    pub count: u64,
}

/// Latency timer contents for one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySnapshot {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
    pub buckets: Vec<HistogramBucket>,
}

/// A point-in-time snapshot of all metrics, key-ordered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub errors_total: u64,
    pub requests_by_operation: BTreeMap<String, u64>,
    pub errors_by_operation: BTreeMap<String, BTreeMap<String, u64>>,
    pub latency: BTreeMap<String, LatencySnapshot>,
}
