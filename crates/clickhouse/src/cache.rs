//! Read-through table cache.
//!
//! Dashboard-style callers re-read the same enriched table on every filter
//! change. `CachedReader` memoizes those reads explicitly, keyed by table
//! name, instead of hiding a process-global cache inside the load function.
//! Invalidate after an ETL run replaces the destination table.

use fraud_core::{EnrichedRecord, Result, TableStore};
use moka::future::Cache;
use std::sync::Arc;
use telemetry::metrics;
use tracing::debug;

/// Memoizing reader over any [`TableStore`].
pub struct CachedReader<S> {
    store: Arc<S>,
    tables: Cache<String, Arc<Vec<EnrichedRecord>>>,
}

impl<S: TableStore> CachedReader<S> {
    /// Cache holding up to `capacity` tables.
    pub fn new(store: Arc<S>, capacity: u64) -> Self {
        Self {
            store,
            tables: Cache::new(capacity),
        }
    }

    /// Read an enriched table, serving repeated reads from memory.
    ///
    /// Errors are never cached: a failed read leaves the entry absent so
    /// the next call retries the store.
    pub async fn read_enriched(&self, table: &str) -> Result<Arc<Vec<EnrichedRecord>>> {
        if let Some(rows) = self.tables.get(table).await {
            metrics().table_cache_hits.inc();
            return Ok(rows);
        }

        metrics().table_cache_misses.inc();
        let rows = Arc::new(self.store.read_enriched(table).await?);
        self.tables.insert(table.to_string(), rows.clone()).await;
        debug!(table = %table, rows = rows.len(), "Cached enriched table");
        Ok(rows)
    }

    /// Drop the cached copy of a table, forcing the next read to hit the
    /// store. Call after the ETL pipeline replaces the table.
    pub async fn invalidate(&self, table: &str) {
        self.tables.invalidate(table).await;
    }

    /// Access to the wrapped store for non-cached operations.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
