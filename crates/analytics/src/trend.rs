//! Daily transaction/fraud volume, feeding the trend chart.

use chrono::{DateTime, NaiveDate, Utc};
use fraud_core::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transaction and fraud counts for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub day: NaiveDate,
    pub transactions: u64,
    pub frauds: u64,
}

/// Bucket records into UTC calendar days, sorted ascending.
///
/// Records whose millisecond timestamp falls outside chrono's representable
/// range are skipped.
pub fn daily_trend(dataset: &Dataset) -> Vec<DailyVolume> {
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for record in dataset.records() {
        let Some(ts) = DateTime::<Utc>::from_timestamp_millis(record.timestamp) else {
            continue;
        };
        let entry = days.entry(ts.date_naive()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(record.fraud_label);
    }

    days.into_iter()
        .map(|(day, (transactions, frauds))| DailyVolume {
            day,
            transactions,
            frauds,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraud_core::EnrichedRecord;

    fn record(id: &str, timestamp: i64, fraud: u8) -> EnrichedRecord {
        EnrichedRecord {
            transaction_id: id.into(),
            user_id: "u1".into(),
            timestamp,
            amount: 1.0,
            transaction_type: "online".into(),
            location: None,
            latitude: None,
            longitude: None,
            risk_score: 0.1,
            failed_count_7d: 0,
            fraud_label: fraud,
            hour_of_day: 0,
            weekday: 0,
            month: 1,
        }
    }

    const JAN1: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z
    const JAN2: i64 = 1_704_153_600_000;

    #[test]
    fn buckets_by_utc_day_in_order() {
        let ds = Dataset::new(vec![
            record("a", JAN2, 0),
            record("b", JAN1, 1),
            record("c", JAN1 + 3_600_000, 0),
        ]);
        let trend = daily_trend(&ds);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(trend[0].transactions, 2);
        assert_eq!(trend[0].frauds, 1);
        assert_eq!(trend[1].transactions, 1);
        assert_eq!(trend[1].frauds, 0);
    }

    #[test]
    fn empty_dataset_gives_empty_trend() {
        assert!(daily_trend(&Dataset::new(vec![])).is_empty());
    }
}
