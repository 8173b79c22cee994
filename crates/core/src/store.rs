//! The table-store seam.
//!
//! The ETL pipeline and the binary talk to persistence through this trait so
//! tests can substitute an in-memory store. The production implementation
//! lives in the `clickhouse-store` crate.

use crate::error::Result;
use crate::record::{EnrichedRecord, TransactionRecord};
use async_trait::async_trait;

/// A queryable store of named tables.
///
/// `replace_enriched` has destructive replace semantics: the destination
/// table is dropped and recreated, never merged. There is no transactional
/// rollback; a failure mid-write can leave a partial destination table, and
/// the caller is expected to retry the whole ETL run.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read every row of a raw transaction table.
    async fn read_transactions(&self, table: &str) -> Result<Vec<TransactionRecord>>;

    /// Read every row of an enriched table.
    async fn read_enriched(&self, table: &str) -> Result<Vec<EnrichedRecord>>;

    /// Replace the named enriched table with the given rows. Returns the
    /// number of rows written.
    async fn replace_enriched(&self, table: &str, rows: &[EnrichedRecord]) -> Result<usize>;

    /// Append raw transactions to a source table, creating it if needed.
    /// Used for seeding and backfills, not by the pipeline itself.
    async fn insert_transactions(&self, table: &str, rows: &[TransactionRecord]) -> Result<usize>;
}
