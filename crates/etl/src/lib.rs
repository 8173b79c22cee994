//! Batch ETL pipeline: extract raw transactions, derive time features,
//! load the enriched table back into the store.

pub mod features;
pub mod pipeline;

pub use features::{enrich, enrich_record, parse_timestamp};
pub use pipeline::{EtlConfig, EtlPipeline, EtlReport};
