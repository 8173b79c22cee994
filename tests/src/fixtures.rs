//! Test fixtures: raw transaction builders and sample tables.

use fraud_core::TransactionRecord;

/// A plain legitimate transaction with no geo data.
pub fn transaction(id: &str, timestamp: &str) -> TransactionRecord {
    TransactionRecord {
        transaction_id: id.into(),
        user_id: format!("user-{id}"),
        timestamp: timestamp.into(),
        amount: 100.0,
        transaction_type: "online".into(),
        location: None,
        latitude: None,
        longitude: None,
        risk_score: 0.1,
        failed_count_7d: 0,
        fraud_label: 0,
    }
}

/// A transaction pinned to a location.
pub fn located_transaction(
    id: &str,
    timestamp: &str,
    location: &str,
    lat: f64,
    lon: f64,
    fraud: u8,
) -> TransactionRecord {
    TransactionRecord {
        location: Some(location.into()),
        latitude: Some(lat),
        longitude: Some(lon),
        fraud_label: fraud,
        risk_score: if fraud == 1 { 0.9 } else { 0.1 },
        ..transaction(id, timestamp)
    }
}

/// A small mixed source table: two locations, one fraud, one row without
/// geo data.
pub fn sample_transactions() -> Vec<TransactionRecord> {
    vec![
        located_transaction("tx-001", "2024-01-01T15:30:00", "Sao Paulo", -23.55, -46.63, 0),
        located_transaction("tx-002", "2024-01-01T18:00:00", "Sao Paulo", -23.55, -46.63, 1),
        located_transaction("tx-003", "2024-01-02T09:15:00", "Recife", -8.05, -34.90, 0),
        TransactionRecord {
            amount: 250.0,
            ..transaction("tx-004", "2024-01-03T23:59:59")
        },
    ]
}
