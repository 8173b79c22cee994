//! Typed read/write operations for the transaction tables.
//!
//! Reads return rows in `Transaction_ID` order so that repeated reads of an
//! unchanged table observe identical row sequences. `replace_enriched`
//! implements the destructive replace contract: drop, recreate, insert.
//! There is no rollback; a failure mid-insert leaves a partial destination
//! table and the whole ETL run must be retried.

use crate::client::ClickHouseClient;
use crate::schema;
use async_trait::async_trait;
use clickhouse::Row;
use fraud_core::{EnrichedRecord, Error, Result, TableStore, TransactionRecord};
use serde::{Deserialize, Serialize};
use telemetry::metrics;
use tracing::debug;

/// Flattened raw transaction row, wire-named for ClickHouse.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: String,
    #[serde(rename = "User_ID")]
    pub user_id: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Transaction_Amount")]
    pub amount: f64,
    #[serde(rename = "Transaction_Type")]
    pub transaction_type: String,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,
    #[serde(rename = "Failed_Transaction_Count_7d")]
    pub failed_count_7d: u32,
    #[serde(rename = "Fraud_Label")]
    pub fraud_label: u8,
}

impl From<TransactionRecord> for TransactionRow {
    fn from(rec: TransactionRecord) -> Self {
        Self {
            transaction_id: rec.transaction_id,
            user_id: rec.user_id,
            timestamp: rec.timestamp,
            amount: rec.amount,
            transaction_type: rec.transaction_type,
            location: rec.location,
            latitude: rec.latitude,
            longitude: rec.longitude,
            risk_score: rec.risk_score,
            failed_count_7d: rec.failed_count_7d,
            fraud_label: rec.fraud_label,
        }
    }
}

impl From<TransactionRow> for TransactionRecord {
    fn from(row: TransactionRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            user_id: row.user_id,
            timestamp: row.timestamp,
            amount: row.amount,
            transaction_type: row.transaction_type,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            risk_score: row.risk_score,
            failed_count_7d: row.failed_count_7d,
            fraud_label: row.fraud_label,
        }
    }
}

/// Flattened enriched row. `timestamp` maps to DateTime64(3) as epoch
/// milliseconds.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct EnrichedRow {
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: String,
    #[serde(rename = "User_ID")]
    pub user_id: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "Transaction_Amount")]
    pub amount: f64,
    #[serde(rename = "Transaction_Type")]
    pub transaction_type: String,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,
    #[serde(rename = "Failed_Transaction_Count_7d")]
    pub failed_count_7d: u32,
    #[serde(rename = "Fraud_Label")]
    pub fraud_label: u8,
    #[serde(rename = "Hora_do_Dia")]
    pub hour_of_day: u8,
    #[serde(rename = "Dia_da_Semana")]
    pub weekday: u8,
    #[serde(rename = "Mes")]
    pub month: u8,
}

impl From<EnrichedRecord> for EnrichedRow {
    fn from(rec: EnrichedRecord) -> Self {
        Self {
            transaction_id: rec.transaction_id,
            user_id: rec.user_id,
            timestamp: rec.timestamp,
            amount: rec.amount,
            transaction_type: rec.transaction_type,
            location: rec.location,
            latitude: rec.latitude,
            longitude: rec.longitude,
            risk_score: rec.risk_score,
            failed_count_7d: rec.failed_count_7d,
            fraud_label: rec.fraud_label,
            hour_of_day: rec.hour_of_day,
            weekday: rec.weekday,
            month: rec.month,
        }
    }
}

impl From<EnrichedRow> for EnrichedRecord {
    fn from(row: EnrichedRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            user_id: row.user_id,
            timestamp: row.timestamp,
            amount: row.amount,
            transaction_type: row.transaction_type,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            risk_score: row.risk_score,
            failed_count_7d: row.failed_count_7d,
            fraud_label: row.fraud_label,
            hour_of_day: row.hour_of_day,
            weekday: row.weekday,
            month: row.month,
        }
    }
}

/// Classify a clickhouse driver error into the store taxonomy.
///
/// The driver surfaces server errors as text, so classification keys off
/// the server's UNKNOWN_TABLE marker (error code 60) and the driver's
/// network/timeout messages.
fn classify(table: &str, err: clickhouse::error::Error) -> Error {
    metrics().store_errors.inc();
    let msg = err.to_string();
    if msg.contains("UNKNOWN_TABLE") || msg.contains("does not exist") || msg.contains("doesn't exist")
    {
        Error::table_not_found(table)
    } else if msg.contains("network error") || msg.contains("timed out") {
        Error::connection(msg)
    } else {
        Error::query(msg)
    }
}

/// Read every row of a raw transaction table.
pub async fn read_transactions(
    client: &ClickHouseClient,
    table: &str,
) -> Result<Vec<TransactionRecord>> {
    let target = client.qualified(table)?;
    let start = std::time::Instant::now();

    let rows: Vec<TransactionRow> = client
        .inner()
        .query(&format!(
            "SELECT ?fields FROM {target} ORDER BY Transaction_ID"
        ))
        .fetch_all()
        .await
        .map_err(|e| classify(table, e))?;

    metrics().store_reads.inc();
    metrics()
        .store_read_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    debug!(table = %target, rows = rows.len(), "Read transaction table");
    Ok(rows.into_iter().map(TransactionRecord::from).collect())
}

/// Read every row of an enriched table.
pub async fn read_enriched(client: &ClickHouseClient, table: &str) -> Result<Vec<EnrichedRecord>> {
    let target = client.qualified(table)?;
    let start = std::time::Instant::now();

    let rows: Vec<EnrichedRow> = client
        .inner()
        .query(&format!(
            "SELECT ?fields FROM {target} ORDER BY Transaction_ID"
        ))
        .fetch_all()
        .await
        .map_err(|e| classify(table, e))?;

    metrics().store_reads.inc();
    metrics()
        .store_read_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    debug!(table = %target, rows = rows.len(), "Read enriched table");
    Ok(rows.into_iter().map(EnrichedRecord::from).collect())
}

/// Append raw transactions to a source table, creating it if needed.
pub async fn insert_transactions(
    client: &ClickHouseClient,
    table: &str,
    records: &[TransactionRecord],
) -> Result<usize> {
    let target = client.qualified(table)?;
    client
        .inner()
        .query(&schema::create_transactions_table(&target))
        .execute()
        .await
        .map_err(|e| classify(table, e))?;

    if records.is_empty() {
        return Ok(0);
    }

    let start = std::time::Instant::now();
    let mut insert = client
        .inner()
        .insert(&target)
        .map_err(|e| classify(table, e))?;

    for record in records {
        let row = TransactionRow::from(record.clone());
        insert.write(&row).await.map_err(|e| classify(table, e))?;
    }

    insert.end().await.map_err(|e| classify(table, e))?;

    metrics().store_writes.inc();
    metrics()
        .store_write_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    debug!(table = %target, rows = records.len(), "Inserted transactions");
    Ok(records.len())
}

/// Replace the named enriched table: drop, recreate, insert.
pub async fn replace_enriched(
    client: &ClickHouseClient,
    table: &str,
    records: &[EnrichedRecord],
) -> Result<usize> {
    let target = client.qualified(table)?;
    let start = std::time::Instant::now();

    client
        .inner()
        .query(&format!("DROP TABLE IF EXISTS {target}"))
        .execute()
        .await
        .map_err(|e| classify(table, e))?;

    client
        .inner()
        .query(&schema::create_enriched_table(&target))
        .execute()
        .await
        .map_err(|e| classify(table, e))?;

    if records.is_empty() {
        return Ok(0);
    }

    let mut insert = client
        .inner()
        .insert(&target)
        .map_err(|e| classify(table, e))?;

    for record in records {
        let row = EnrichedRow::from(record.clone());
        insert.write(&row).await.map_err(|e| classify(table, e))?;
    }

    insert.end().await.map_err(|e| classify(table, e))?;

    metrics().store_writes.inc();
    metrics()
        .store_write_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    debug!(table = %target, rows = records.len(), "Replaced enriched table");
    Ok(records.len())
}

#[async_trait]
impl TableStore for ClickHouseClient {
    async fn read_transactions(&self, table: &str) -> Result<Vec<TransactionRecord>> {
        read_transactions(self, table).await
    }

    async fn read_enriched(&self, table: &str) -> Result<Vec<EnrichedRecord>> {
        read_enriched(self, table).await
    }

    async fn replace_enriched(&self, table: &str, rows: &[EnrichedRecord]) -> Result<usize> {
        replace_enriched(self, table, rows).await
    }

    async fn insert_transactions(&self, table: &str, rows: &[TransactionRecord]) -> Result<usize> {
        insert_transactions(self, table, rows).await
    }
}
