//! Aggregation engine for the fraud analytics dashboard.
//!
//! Every function here is a pure function of an explicit [`Dataset`]:
//! inputs are never mutated, empty or column-deficient inputs degrade to
//! neutral results, and nothing is cached implicitly (memoization is the
//! caller's explicit choice via [`cache::KpiMemo`]).

pub mod cache;
pub mod correlation;
pub mod geo;
pub mod importance;
pub mod kpi;
pub mod outlier;
pub mod profile;
pub mod trend;

pub use cache::KpiMemo;
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use geo::{aggregate_by_location, LocationAggregate};
pub use importance::{rank_features, FeatureImportance};
pub use kpi::{compute_kpis, KpiSnapshot};
pub use outlier::{identify_outliers, OutlierReport};
pub use profile::{profile_column, CategoricalProfile, ColumnProfile, NumericProfile};
pub use trend::{daily_trend, DailyVolume};
