//! Geographic aggregation for the risk map.

use fraud_core::{columns, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk-tier colors, scanned highest threshold first. Strictly greater-than
/// comparisons: a rate of exactly 10.0 falls to the next tier down.
const RISK_TIERS: &[(f64, &str)] = &[
    (10.0, "#d84315"),
    (5.0, "#f4511e"),
    (0.0, "#ffb300"),
];

/// Color for locations with no recorded fraud.
const NO_FRAUD_COLOR: &str = "#2e7d32";

/// Columns the aggregation cannot run without.
const REQUIRED: &[&str] = &[
    columns::LOCATION,
    columns::LATITUDE,
    columns::LONGITUDE,
    columns::TRANSACTION_ID,
    columns::FRAUD_LABEL,
];

/// One map marker: a location with its volume and fraud statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAggregate {
    pub location: String,
    /// Mean latitude of the constituent records.
    pub lat: f64,
    /// Mean longitude of the constituent records.
    pub lon: f64,
    pub count: u64,
    pub fraud_count: u64,
    /// 100 × fraud_count / count.
    pub fraud_rate: f64,
    /// Risk-tier marker color.
    pub color: String,
    /// Marker radius, log-scaled so heavy locations don't dominate linearly.
    pub radius: f64,
}

impl LocationAggregate {
    /// Descriptive marker label for the map popup.
    pub fn label(&self) -> String {
        format!(
            "{}: {} transactions, {} frauds ({:.2}% fraud rate)",
            self.location, self.count, self.fraud_count, self.fraud_rate
        )
    }
}

/// Color for a fraud-rate percentage, highest tier first.
pub fn risk_color(fraud_rate: f64) -> &'static str {
    RISK_TIERS
        .iter()
        .find(|(threshold, _)| fraud_rate > *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(NO_FRAUD_COLOR)
}

/// Log-scaled marker radius.
pub fn marker_radius(count: u64) -> f64 {
    ((count + 1) as f64).ln() * 3.0
}

/// Aggregate a dataset into one row per distinct location.
///
/// `None` is the explicit no-result signal: a required column is
/// unavailable, the input is empty, or no row carries complete geo data.
/// The caller renders a fallback message instead of a map.
pub fn aggregate_by_location(dataset: &Dataset) -> Option<Vec<LocationAggregate>> {
    if dataset.is_empty() || REQUIRED.iter().any(|c| !dataset.has_column(c)) {
        return None;
    }

    struct Group {
        lat_sum: f64,
        lon_sum: f64,
        count: u64,
        fraud_count: u64,
    }

    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();
    for record in dataset.records() {
        // Rows with incomplete geo data are excluded here and only here.
        let (Some(location), Some(lat), Some(lon)) =
            (record.location.as_deref(), record.latitude, record.longitude)
        else {
            continue;
        };

        let group = groups.entry(location).or_insert(Group {
            lat_sum: 0.0,
            lon_sum: 0.0,
            count: 0,
            fraud_count: 0,
        });
        group.lat_sum += lat;
        group.lon_sum += lon;
        group.count += 1;
        group.fraud_count += u64::from(record.fraud_label);
    }

    if groups.is_empty() {
        return None;
    }

    let aggregates = groups
        .into_iter()
        .map(|(location, g)| {
            let fraud_rate = 100.0 * g.fraud_count as f64 / g.count as f64;
            LocationAggregate {
                location: location.to_string(),
                lat: g.lat_sum / g.count as f64,
                lon: g.lon_sum / g.count as f64,
                count: g.count,
                fraud_count: g.fraud_count,
                fraud_rate,
                color: risk_color(fraud_rate).to_string(),
                radius: marker_radius(g.count),
            }
        })
        .collect();

    Some(aggregates)
}
