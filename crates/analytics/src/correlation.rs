//! Pairwise-complete Pearson correlation across numeric columns.

use fraud_core::{columns, Dataset};
use serde::{Deserialize, Serialize};

/// Square correlation matrix over the dataset's numeric columns.
///
/// Undefined entries (no overlapping rows, or zero variance in the overlap)
/// are NaN, mirroring what a dataframe `corr()` would produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation over rows where both values are present.
fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

/// Compute the correlation matrix over every available numeric column.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let names: Vec<&str> = columns::NUMERIC
        .iter()
        .copied()
        .filter(|c| dataset.has_column(c))
        .collect();

    let series: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| dataset.numeric(name).expect("known numeric column"))
        .collect();

    let mut values = vec![vec![f64::NAN; names.len()]; names.len()];
    for i in 0..names.len() {
        let has_data = series[i].iter().any(Option::is_some);
        values[i][i] = if has_data { 1.0 } else { f64::NAN };
        for j in (i + 1)..names.len() {
            let r = pairwise_pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: names.into_iter().map(String::from).collect(),
        values,
    }
}
