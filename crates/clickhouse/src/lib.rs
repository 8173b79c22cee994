//! ClickHouse table-store adapter for the fraud analytics engine.

pub mod cache;
pub mod client;
pub mod config;
pub mod health;
pub mod schema;
pub mod tables;

pub use cache::CachedReader;
pub use client::*;
pub use config::*;
pub use tables::{EnrichedRow, TransactionRow};
