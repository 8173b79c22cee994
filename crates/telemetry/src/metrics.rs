//! Internal metrics collection.
//!
//! Lock-free in-process counters for the ETL pipeline and the table store.
//! A snapshot can be logged at the end of a run; there is no external
//! metrics backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the analytics engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // ETL pipeline metrics
    pub etl_runs: Counter,
    pub etl_failures: Counter,
    pub rows_extracted: Counter,
    pub rows_loaded: Counter,
    pub invalid_rows: Counter,

    // Table store metrics
    pub store_reads: Counter,
    pub store_writes: Counter,
    pub store_errors: Counter,

    // Read-through cache metrics
    pub table_cache_hits: Counter,
    pub table_cache_misses: Counter,

    // KPI memoization metrics
    pub kpi_memo_hits: Counter,
    pub kpi_memo_misses: Counter,

    // Latency histograms
    pub store_read_latency_ms: Histogram,
    pub store_write_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub etl_runs: u64,
    pub etl_failures: u64,
    pub rows_extracted: u64,
    pub rows_loaded: u64,
    pub invalid_rows: u64,
    pub store_reads: u64,
    pub store_writes: u64,
    pub store_errors: u64,
    pub table_cache_hits: u64,
    pub table_cache_misses: u64,
    pub kpi_memo_hits: u64,
    pub kpi_memo_misses: u64,
    pub store_read_latency_mean_ms: f64,
    pub store_write_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            etl_runs: self.etl_runs.get(),
            etl_failures: self.etl_failures.get(),
            rows_extracted: self.rows_extracted.get(),
            rows_loaded: self.rows_loaded.get(),
            invalid_rows: self.invalid_rows.get(),
            store_reads: self.store_reads.get(),
            store_writes: self.store_writes.get(),
            store_errors: self.store_errors.get(),
            table_cache_hits: self.table_cache_hits.get(),
            table_cache_misses: self.table_cache_misses.get(),
            kpi_memo_hits: self.kpi_memo_hits.get(),
            kpi_memo_misses: self.kpi_memo_misses.get(),
            store_read_latency_mean_ms: self.store_read_latency_ms.mean(),
            store_write_latency_mean_ms: self.store_write_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
