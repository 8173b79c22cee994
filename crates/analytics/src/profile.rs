//! Univariate column profiles.

use crate::outlier;
use fraud_core::{columns, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile of a numeric column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericProfile {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for fewer than two
    /// values.
    pub std_dev: f64,
    pub outlier_count: usize,
}

/// Profile of a categorical column.
///
/// `mode` ties are broken by first-encountered row order, which makes the
/// result deterministic for a given dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalProfile {
    pub distinct: u64,
    pub mode: Option<String>,
}

/// Either kind of univariate profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnProfile {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
}

/// Profile one column by wire name; `None` for an unknown or unavailable
/// column.
pub fn profile_column(dataset: &Dataset, column: &str) -> Option<ColumnProfile> {
    if columns::NUMERIC.contains(&column) {
        return numeric_profile(dataset, column).map(ColumnProfile::Numeric);
    }
    if columns::CATEGORICAL.contains(&column) {
        return categorical_profile(dataset, column).map(ColumnProfile::Categorical);
    }
    None
}

fn numeric_profile(dataset: &Dataset, column: &str) -> Option<NumericProfile> {
    let values = dataset.numeric(column)?;
    let mut present: Vec<f64> = values.into_iter().flatten().collect();
    if present.is_empty() {
        return Some(NumericProfile::default());
    }
    present.sort_by(|a, b| a.total_cmp(b));

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let median = outlier::quantile(&present, 0.5).expect("non-empty");
    let std_dev = if present.len() < 2 {
        0.0
    } else {
        let sum_sq: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    };

    Some(NumericProfile {
        mean,
        median,
        std_dev,
        outlier_count: outlier::identify_outliers(dataset, column).count,
    })
}

fn categorical_profile(dataset: &Dataset, column: &str) -> Option<CategoricalProfile> {
    let values = dataset.categorical(column)?;

    // Count with first-seen position so mode ties resolve to the value
    // encountered earliest.
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        let Some(value) = value else { continue };
        counts
            .entry(value)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
    }

    let mode = counts
        .iter()
        .min_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)))
        .map(|(value, _)| (*value).to_string());

    Some(CategoricalProfile {
        distinct: counts.len() as u64,
        mode,
    })
}
