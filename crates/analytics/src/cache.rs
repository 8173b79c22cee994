//! Explicit KPI memoization.
//!
//! Dashboard callers recompute KPIs for the same filtered subset on every
//! interaction. `KpiMemo` caches snapshots keyed by the dataset's content
//! fingerprint, so identical inputs hit the cache and any change to the
//! underlying rows misses it. The key is explicit; nothing is shared
//! between independent computations.

use crate::kpi::{compute_kpis, KpiSnapshot};
use fraud_core::Dataset;
use moka::sync::Cache;
use telemetry::metrics;

/// Fingerprint-keyed KPI cache.
pub struct KpiMemo {
    snapshots: Cache<u64, KpiSnapshot>,
}

impl KpiMemo {
    /// Memo holding up to `capacity` snapshots.
    pub fn new(capacity: u64) -> Self {
        Self {
            snapshots: Cache::new(capacity),
        }
    }

    /// KPI snapshot for the dataset, computed at most once per fingerprint.
    pub fn snapshot(&self, dataset: &Dataset) -> KpiSnapshot {
        let key = dataset.fingerprint();
        if let Some(hit) = self.snapshots.get(&key) {
            metrics().kpi_memo_hits.inc();
            return hit;
        }

        metrics().kpi_memo_misses.inc();
        let snapshot = compute_kpis(dataset);
        self.snapshots.insert(key, snapshot.clone());
        snapshot
    }

    pub fn entry_count(&self) -> u64 {
        self.snapshots.entry_count()
    }
}

impl Default for KpiMemo {
    fn default() -> Self {
        Self::new(64)
    }
}
