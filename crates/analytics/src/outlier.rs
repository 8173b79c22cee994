//! IQR outlier detection.

use fraud_core::{Dataset, EnrichedRecord};

/// Outliers of one numeric column.
///
/// Records strictly outside `[lower_bound, upper_bound]`. An unknown or
/// unavailable column yields the default report: no records, count 0.
#[derive(Debug, Clone, Default)]
pub struct OutlierReport {
    pub records: Vec<EnrichedRecord>,
    pub count: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Linear-interpolation quantile over sorted values.
///
/// Matches the conventional `(n - 1) * q` position with interpolation
/// between the surrounding order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * q;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let fraction = position - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * fraction)
}

/// Identify IQR outliers in a numeric column.
///
/// Bounds are `Q1 - 1.5 * IQR` and `Q3 + 1.5 * IQR`; rows with a missing
/// cell in the column are neither outliers nor part of the quantile basis.
pub fn identify_outliers(dataset: &Dataset, column: &str) -> OutlierReport {
    let Some(values) = dataset.numeric(column) else {
        return OutlierReport::default();
    };

    let mut present: Vec<f64> = values.iter().copied().flatten().collect();
    if present.is_empty() {
        return OutlierReport::default();
    }
    present.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&present, 0.25).expect("non-empty");
    let q3 = quantile(&present, 0.75).expect("non-empty");
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let records: Vec<EnrichedRecord> = dataset
        .records()
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| matches!(v, Some(v) if *v < lower_bound || *v > upper_bound))
        .map(|(r, _)| r.clone())
        .collect();

    OutlierReport {
        count: records.len(),
        records,
        lower_bound,
        upper_bound,
    }
}
