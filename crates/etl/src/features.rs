//! Time-feature derivation for the Transform stage.
//!
//! Pure functions of the raw record: each derived field is computed once
//! here and never recomputed downstream. Row count and order are preserved;
//! the fraud label is coerced to a strict 0/1 encoding.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use fraud_core::{EnrichedRecord, Error, Result, TransactionRecord};

/// Accepted timestamp layouts, tried after RFC 3339.
const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse raw date-time text from the source table.
///
/// RFC 3339 input is normalized to UTC; offset-less input is taken as-is.
pub fn parse_timestamp(raw: &str) -> chrono::format::ParseResult<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }

    let mut last_err = None;
    for format in FORMATS {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(dt) => return Ok(dt),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.expect("FORMATS is non-empty"))
}

/// Transform a single raw record into its enriched form.
pub fn enrich_record(rec: TransactionRecord) -> Result<EnrichedRecord> {
    let parsed = parse_timestamp(&rec.timestamp).map_err(|source| Error::Timestamp {
        row: rec.transaction_id.clone(),
        value: rec.timestamp.clone(),
        source,
    })?;

    Ok(EnrichedRecord {
        transaction_id: rec.transaction_id,
        user_id: rec.user_id,
        timestamp: parsed.and_utc().timestamp_millis(),
        amount: rec.amount,
        transaction_type: rec.transaction_type,
        location: rec.location,
        latitude: rec.latitude,
        longitude: rec.longitude,
        risk_score: rec.risk_score,
        failed_count_7d: rec.failed_count_7d,
        // Any truthy source encoding collapses to 1.
        fraud_label: u8::from(rec.fraud_label != 0),
        hour_of_day: parsed.hour() as u8,
        // Monday = 0 through Sunday = 6.
        weekday: parsed.weekday().num_days_from_monday() as u8,
        month: parsed.month() as u8,
    })
}

/// Transform a batch, preserving row count and order.
///
/// The first unparseable timestamp aborts the whole batch; partial
/// transforms never reach the Load stage.
pub fn enrich(records: Vec<TransactionRecord>) -> Result<Vec<EnrichedRecord>> {
    records.into_iter().map(enrich_record).collect()
}
