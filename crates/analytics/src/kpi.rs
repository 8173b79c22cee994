//! Headline KPI computation over a record subset.

use fraud_core::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scalar aggregates for a record subset.
///
/// `fraud_rate` is a percentage of the unique transaction count and lies in
/// [0, 100]. Every division guards its denominator: an empty subset (or an
/// empty class) yields zeros, never NaN and never a panic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Sum of all transaction amounts.
    pub total_value: f64,
    /// Count of distinct `Transaction_ID` values.
    pub transaction_count: u64,
    /// Mean amount per row.
    pub mean_ticket: f64,
    /// Rows labelled as fraud.
    pub fraud_count: u64,
    /// Sum of amounts over fraud rows.
    pub fraud_value: f64,
    /// 100 × fraud_count / transaction_count.
    pub fraud_rate: f64,
    /// Mean risk score over fraud rows.
    pub mean_risk_fraud: f64,
    /// Mean risk score over legitimate rows.
    pub mean_risk_legit: f64,
}

/// Compute the KPI snapshot for a dataset.
pub fn compute_kpis(dataset: &Dataset) -> KpiSnapshot {
    if dataset.is_empty() {
        return KpiSnapshot::default();
    }

    let records = dataset.records();

    let transaction_count = records
        .iter()
        .map(|r| r.transaction_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    let total_value: f64 = records.iter().map(|r| r.amount).sum();
    let mean_ticket = total_value / records.len() as f64;

    let mut fraud_count = 0u64;
    let mut fraud_value = 0.0;
    let mut fraud_risk_sum = 0.0;
    let mut legit_count = 0u64;
    let mut legit_risk_sum = 0.0;

    for record in records {
        if record.is_fraud() {
            fraud_count += 1;
            fraud_value += record.amount;
            fraud_risk_sum += record.risk_score;
        } else {
            legit_count += 1;
            legit_risk_sum += record.risk_score;
        }
    }

    let fraud_rate = if transaction_count > 0 {
        100.0 * fraud_count as f64 / transaction_count as f64
    } else {
        0.0
    };

    KpiSnapshot {
        total_value,
        transaction_count,
        mean_ticket,
        fraud_count,
        fraud_value,
        fraud_rate,
        mean_risk_fraud: if fraud_count > 0 {
            fraud_risk_sum / fraud_count as f64
        } else {
            0.0
        },
        mean_risk_legit: if legit_count > 0 {
            legit_risk_sum / legit_count as f64
        } else {
            0.0
        },
    }
}
