//! Unified error types for the fraud analytics engine.
//!
//! Store-layer failures (unreachable server, missing table) are fatal to the
//! current operation and propagate to the top-level caller. Empty datasets
//! and unknown columns are conditions, not errors: aggregation functions
//! return neutral results instead of variants from this enum.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the fraud analytics engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The table store could not be reached.
    #[error("store unreachable: {0}")]
    Connection(String),

    /// A named table does not exist in the store.
    #[error("table '{0}' not found in the store")]
    TableNotFound(String),

    /// Any other store-level query failure.
    #[error("query error: {0}")]
    Query(String),

    /// A raw timestamp could not be parsed during the Transform stage.
    #[error("unparseable timestamp {value:?} in transaction '{row}': {source}")]
    Timestamp {
        row: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a table-not-found error.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound(table.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error indicates the store itself is unreachable,
    /// as opposed to a problem with a specific table or query.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
