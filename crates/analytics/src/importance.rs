//! Feature-importance reporting.
//!
//! Encode → fit → extract importances → sort. The boosted model itself is a
//! black box: importances are measured by permuting one encoded column at a
//! time with a seeded shuffle and observing how much the fit degrades, then
//! normalized to sum to one. Sampling ratios are pinned to 1.0 and the
//! permutation RNG is seeded, so the ranking is bit-stable for a given
//! dataset and seed.

use fraud_core::{columns, Dataset};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Default seed for reproducible rankings.
pub const DEFAULT_SEED: u64 = 42;

const ITERATIONS: usize = 100;
const MAX_DEPTH: u32 = 6;
const SHRINKAGE: f32 = 0.1;

/// One ranked feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Share of total fit degradation, in [0, 1]; all importances sum to 1
    /// unless every feature is inert.
    pub importance: f64,
}

/// The encoded model input: identifier and timestamp columns dropped,
/// categoricals one-hot expanded, fraud label split off as the target.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f32>>,
    pub labels: Vec<u8>,
}

/// Numeric columns that enter the model directly.
fn numeric_features(dataset: &Dataset) -> Vec<&'static str> {
    columns::NUMERIC
        .iter()
        .copied()
        .filter(|c| *c != columns::FRAUD_LABEL && dataset.has_column(c))
        .collect()
}

/// Categorical columns that get one-hot expanded. `User_ID` is an
/// identifier and is dropped along with `Transaction_ID` and `Timestamp`.
fn categorical_features(dataset: &Dataset) -> Vec<&'static str> {
    [columns::TRANSACTION_TYPE, columns::LOCATION]
        .into_iter()
        .filter(|c| dataset.has_column(c))
        .collect()
}

/// Encode the dataset into the model's input layout.
///
/// One-hot columns are named `<Column>_<value>` with values in sorted
/// order; a missing categorical cell encodes as all-zeros across its
/// dummies, and missing coordinates impute to 0.0.
pub fn encode_features(dataset: &Dataset) -> FeatureMatrix {
    if dataset.is_empty() {
        return FeatureMatrix::default();
    }

    let numeric = numeric_features(dataset);
    let mut names: Vec<String> = numeric.iter().map(|c| (*c).to_string()).collect();

    let mut dummies: Vec<(&'static str, Vec<String>)> = Vec::new();
    for column in categorical_features(dataset) {
        let values = dataset.categorical(column).expect("known categorical");
        let distinct: BTreeSet<String> = values.iter().flatten().map(|v| (*v).to_string()).collect();
        let ordered: Vec<String> = distinct.into_iter().collect();
        for value in &ordered {
            names.push(format!("{column}_{value}"));
        }
        dummies.push((column, ordered));
    }

    let mut rows = Vec::with_capacity(dataset.len());
    let mut labels = Vec::with_capacity(dataset.len());

    let numeric_series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|c| dataset.numeric(c).expect("known numeric"))
        .collect();
    let categorical_series: Vec<Vec<Option<&str>>> = dummies
        .iter()
        .map(|(c, _)| dataset.categorical(c).expect("known categorical"))
        .collect();

    for (i, record) in dataset.records().iter().enumerate() {
        let mut row: Vec<f32> = Vec::with_capacity(names.len());
        for series in &numeric_series {
            row.push(series[i].unwrap_or(0.0) as f32);
        }
        for ((_, ordered), series) in dummies.iter().zip(categorical_series.iter()) {
            let cell = series[i];
            for value in ordered {
                row.push(if cell == Some(value.as_str()) { 1.0 } else { 0.0 });
            }
        }
        rows.push(row);
        labels.push(record.fraud_label);
    }

    FeatureMatrix {
        names,
        rows,
        labels,
    }
}

/// Fit the boosted classifier with the fixed hyperparameters.
fn fit(matrix: &FeatureMatrix) -> GBDT {
    let mut cfg = Config::new();
    cfg.set_feature_size(matrix.names.len());
    cfg.set_max_depth(MAX_DEPTH);
    cfg.set_iterations(ITERATIONS);
    cfg.set_shrinkage(SHRINKAGE);
    cfg.set_loss("LogLikelyhood");
    // Full sampling keeps training deterministic.
    cfg.set_data_sample_ratio(1.0);
    cfg.set_feature_sample_ratio(1.0);

    let mut training: DataVec = matrix
        .rows
        .iter()
        .zip(matrix.labels.iter())
        .map(|(row, label)| Data::new_training_data(row.clone(), 1.0, signed(*label), None))
        .collect();

    let mut model = GBDT::new(&cfg);
    model.fit(&mut training);
    model
}

/// Log-likelihood training uses a signed binary target.
fn signed(label: u8) -> f32 {
    if label == 1 {
        1.0
    } else {
        -1.0
    }
}

/// Mean squared deviation between predictions and the signed labels.
fn fit_error(model: &GBDT, rows: &[Vec<f32>], labels: &[u8]) -> f64 {
    let data: DataVec = rows
        .iter()
        .map(|row| Data::new_test_data(row.clone(), None))
        .collect();
    let predictions = model.predict(&data);

    let sum: f64 = predictions
        .iter()
        .zip(labels.iter())
        .map(|(pred, label)| {
            let diff = f64::from(*pred) - f64::from(signed(*label));
            diff * diff
        })
        .sum();
    sum / rows.len() as f64
}

/// Train the classifier and rank features by permutation importance.
///
/// Returns an empty ranking when there is nothing to learn from: fewer than
/// two rows, no encodable features, or a single-class target.
pub fn rank_features(dataset: &Dataset, seed: u64) -> Vec<FeatureImportance> {
    let matrix = encode_features(dataset);
    if matrix.rows.len() < 2 || matrix.names.is_empty() {
        return Vec::new();
    }

    let positives = matrix.labels.iter().filter(|l| **l == 1).count();
    if positives == 0 || positives == matrix.labels.len() {
        debug!("Single-class target, skipping feature-importance training");
        return Vec::new();
    }

    info!(
        rows = matrix.rows.len(),
        features = matrix.names.len(),
        seed,
        "Training feature-importance model"
    );

    let model = fit(&matrix);
    let baseline = fit_error(&model, &matrix.rows, &matrix.labels);

    // One seeded permutation, applied to every feature column in turn, so
    // each feature is scrambled against the same row order.
    let mut permutation: Vec<usize> = (0..matrix.rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let mut ranked: Vec<FeatureImportance> = matrix
        .names
        .iter()
        .enumerate()
        .map(|(feature_idx, name)| {
            let mut permuted = matrix.rows.clone();
            for (row_idx, source_idx) in permutation.iter().enumerate() {
                permuted[row_idx][feature_idx] = matrix.rows[*source_idx][feature_idx];
            }
            let degraded = fit_error(&model, &permuted, &matrix.labels);
            FeatureImportance {
                feature: name.clone(),
                importance: (degraded - baseline).max(0.0),
            }
        })
        .collect();

    let total: f64 = ranked.iter().map(|f| f.importance).sum();
    if total > 0.0 {
        for feature in &mut ranked {
            feature.importance /= total;
        }
    }

    // Descending importance; name breaks ties for bit-stable ordering.
    ranked.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    ranked
}
