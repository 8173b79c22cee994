//! Mock implementations for testing.

use async_trait::async_trait;
use fraud_core::{EnrichedRecord, Error, Result, TableStore, TransactionRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory table store.
///
/// Implements the same `TableStore` trait as the real ClickHouse adapter,
/// letting tests drive the ETL pipeline and observe exactly what would be
/// written, without a running server. Failure modes can be toggled to
/// exercise the error paths.
#[derive(Clone, Default)]
pub struct MockStore {
    transactions: Arc<Mutex<HashMap<String, Vec<TransactionRecord>>>>,
    enriched: Arc<Mutex<HashMap<String, Vec<EnrichedRecord>>>>,
    /// Simulate an unreachable store.
    fail_connection: Arc<Mutex<bool>>,
    /// Simulate write failures only.
    fail_writes: Arc<Mutex<bool>>,
    reads: Arc<Mutex<usize>>,
    writes: Arc<Mutex<usize>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a source table.
    pub fn seed_transactions(&self, table: &str, rows: Vec<TransactionRecord>) {
        self.transactions.lock().insert(table.to_string(), rows);
    }

    /// Seed an enriched table directly (e.g. a stale destination).
    pub fn seed_enriched(&self, table: &str, rows: Vec<EnrichedRecord>) {
        self.enriched.lock().insert(table.to_string(), rows);
    }

    /// Stored contents of an enriched table, if any.
    pub fn enriched_table(&self, table: &str) -> Option<Vec<EnrichedRecord>> {
        self.enriched.lock().get(table).cloned()
    }

    pub fn set_fail_connection(&self, fail: bool) {
        *self.fail_connection.lock() = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    /// Number of read operations served.
    pub fn read_count(&self) -> usize {
        *self.reads.lock()
    }

    /// Number of write operations that reached the store.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }

    fn check_connection(&self) -> Result<()> {
        if *self.fail_connection.lock() {
            return Err(Error::connection("mock store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MockStore {
    async fn read_transactions(&self, table: &str) -> Result<Vec<TransactionRecord>> {
        self.check_connection()?;
        *self.reads.lock() += 1;
        self.transactions
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| Error::table_not_found(table))
    }

    async fn read_enriched(&self, table: &str) -> Result<Vec<EnrichedRecord>> {
        self.check_connection()?;
        *self.reads.lock() += 1;
        self.enriched
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| Error::table_not_found(table))
    }

    async fn replace_enriched(&self, table: &str, rows: &[EnrichedRecord]) -> Result<usize> {
        self.check_connection()?;
        if *self.fail_writes.lock() {
            return Err(Error::query("mock write failure"));
        }
        *self.writes.lock() += 1;
        self.enriched.lock().insert(table.to_string(), rows.to_vec());
        Ok(rows.len())
    }

    async fn insert_transactions(&self, table: &str, rows: &[TransactionRecord]) -> Result<usize> {
        self.check_connection()?;
        if *self.fail_writes.lock() {
            return Err(Error::query("mock write failure"));
        }
        *self.writes.lock() += 1;
        self.transactions
            .lock()
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_table_is_not_found() {
        let store = MockStore::new();
        let err = store.read_transactions("nope").await.unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }

    #[tokio::test]
    async fn offline_store_reports_connection_error() {
        let store = MockStore::new();
        store.seed_transactions("transactions", vec![]);
        store.set_fail_connection(true);
        let err = store.read_transactions("transactions").await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn replace_overwrites_previous_rows() {
        let store = MockStore::new();
        store.seed_enriched("dest", vec![]);
        store.replace_enriched("dest", &[]).await.unwrap();
        assert_eq!(store.enriched_table("dest").unwrap().len(), 0);
        assert_eq!(store.write_count(), 1);
    }
}
