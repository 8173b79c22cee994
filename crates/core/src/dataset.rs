//! In-memory tabular dataset over enriched records.
//!
//! Aggregation functions address columns by wire name. A dataset carries an
//! explicit set of available columns so that "column absent" is an ordinary
//! answer (`None`) rather than a panic or an error: a source table without
//! geo columns simply produces a dataset where `Latitude` is unavailable.

use crate::record::{columns, EnrichedRecord};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An immutable, in-memory slice of the enriched table.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
    available: Vec<&'static str>,
}

impl Dataset {
    /// Dataset with the full enriched-table column set.
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self::with_columns(records, columns::ALL)
    }

    /// Dataset restricted to a subset of columns, e.g. when the source
    /// table was materialized without geo data.
    pub fn with_columns(records: Vec<EnrichedRecord>, available: &[&'static str]) -> Self {
        Self {
            records,
            available: available.to_vec(),
        }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.available.iter().any(|c| *c == name)
    }

    /// Row-aligned values of a numeric column; `None` for an unknown or
    /// unavailable column. Missing cells (absent coordinates) are `None`
    /// entries within the vector.
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if !self.has_column(name) || !columns::NUMERIC.contains(&name) {
            return None;
        }
        let values = self
            .records
            .iter()
            .map(|r| match name {
                columns::AMOUNT => Some(r.amount),
                columns::LATITUDE => r.latitude,
                columns::LONGITUDE => r.longitude,
                columns::RISK_SCORE => Some(r.risk_score),
                columns::FAILED_COUNT_7D => Some(f64::from(r.failed_count_7d)),
                columns::FRAUD_LABEL => Some(f64::from(r.fraud_label)),
                columns::HOUR_OF_DAY => Some(f64::from(r.hour_of_day)),
                columns::WEEKDAY => Some(f64::from(r.weekday)),
                columns::MONTH => Some(f64::from(r.month)),
                _ => unreachable!("not a numeric column: {name}"),
            })
            .collect();
        Some(values)
    }

    /// Row-aligned values of a categorical column; `None` for an unknown or
    /// unavailable column.
    pub fn categorical(&self, name: &str) -> Option<Vec<Option<&str>>> {
        if !self.has_column(name) || !columns::CATEGORICAL.contains(&name) {
            return None;
        }
        let values = self
            .records
            .iter()
            .map(|r| match name {
                columns::USER_ID => Some(r.user_id.as_str()),
                columns::TRANSACTION_TYPE => Some(r.transaction_type.as_str()),
                columns::LOCATION => r.location.as_deref(),
                _ => unreachable!("not a categorical column: {name}"),
            })
            .collect();
        Some(values)
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn numeric_present(&self, name: &str) -> Option<Vec<f64>> {
        self.numeric(name)
            .map(|vs| vs.into_iter().flatten().collect())
    }

    /// Stable content fingerprint, used as a memoization key.
    ///
    /// Two datasets with equal records (in order) and equal column sets
    /// produce equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.available.hash(&mut hasher);
        self.records.len().hash(&mut hasher);
        for record in &self.records {
            record.hash(&mut hasher);
        }
        hasher.finish()
    }
}
