//! Core types, dataset access, and validation for the fraud analytics engine.

pub mod dataset;
pub mod error;
pub mod record;
pub mod store;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use record::{columns, EnrichedRecord, TransactionRecord};
pub use store::TableStore;
