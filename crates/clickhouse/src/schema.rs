//! ClickHouse table schemas.
//!
//! Two table shapes exist: the raw source table (timestamp still text) and
//! the enriched destination table written by the ETL pipeline. Wire column
//! names are the external contract and match `fraud_core::columns`.

use crate::client::ClickHouseClient;
use fraud_core::Result;

/// DDL for a raw transaction table.
///
/// `Timestamp` is deliberately `String`: source systems deliver date-time
/// text and parsing is the Transform stage's job, not the store's.
pub fn create_transactions_table(target: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {target} (
    Transaction_ID String,
    User_ID String,
    Timestamp String,
    Transaction_Amount Float64,
    Transaction_Type LowCardinality(String),
    Location Nullable(String),
    Latitude Nullable(Float64),
    Longitude Nullable(Float64),
    Risk_Score Float64,
    Failed_Transaction_Count_7d UInt32,
    Fraud_Label UInt8
)
ENGINE = MergeTree()
ORDER BY Transaction_ID
SETTINGS index_granularity = 8192
"#
    )
}

/// DDL for an enriched destination table: source columns with the parsed
/// timestamp plus the three derived time features.
pub fn create_enriched_table(target: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {target} (
    Transaction_ID String,
    User_ID String,
    Timestamp DateTime64(3),
    Transaction_Amount Float64,
    Transaction_Type LowCardinality(String),
    Location Nullable(String),
    Latitude Nullable(Float64),
    Longitude Nullable(Float64),
    Risk_Score Float64,
    Failed_Transaction_Count_7d UInt32,
    Fraud_Label UInt8,
    Hora_do_Dia UInt8,
    Dia_da_Semana UInt8,
    Mes UInt8
)
ENGINE = MergeTree()
ORDER BY (Timestamp, Transaction_ID)
SETTINGS index_granularity = 8192
"#
    )
}

/// SQL for creating the database.
pub fn create_database(database: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {database}")
}

/// Initialize the database and the default source table.
///
/// The destination table is not created here: the Load stage recreates it
/// on every run as part of its replace semantics.
pub async fn init_schema(client: &ClickHouseClient, source_table: &str) -> Result<()> {
    let database = client.config().database.clone();
    let source = client.qualified(source_table)?;

    for sql in [
        create_database(&database),
        create_transactions_table(&source),
    ] {
        client
            .inner()
            .query(&sql)
            .execute()
            .await
            .map_err(|e| fraud_core::Error::query(format!("schema init: {e}")))?;
    }
    Ok(())
}
