//! ClickHouse client wrapper.

use crate::config::ClickHouseConfig;
use clickhouse::Client;
use fraud_core::{Error, Result};
use tracing::info;

/// ClickHouse client wrapper carrying its configuration.
#[derive(Clone)]
pub struct ClickHouseClient {
    inner: Client,
    config: ClickHouseConfig,
}

impl ClickHouseClient {
    /// Creates a new ClickHouse client.
    ///
    /// The database name becomes part of every qualified table reference,
    /// so it is validated up front like any other identifier.
    pub fn new(config: ClickHouseConfig) -> Result<Self> {
        if !is_valid_identifier(&config.database) {
            return Err(Error::InvalidTableName(config.database.clone()));
        }

        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(ref user) = config.username {
            client = client.with_user(user);
        }

        if let Some(ref pass) = config.password {
            client = client.with_password(pass);
        }

        info!(
            url = %config.url,
            database = %config.database,
            "Created ClickHouse client"
        );

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    /// Fully qualified, validated `database.table` reference.
    pub fn qualified(&self, table: &str) -> Result<String> {
        if !is_valid_identifier(table) {
            return Err(Error::InvalidTableName(table.to_string()));
        }
        Ok(format!("{}.{}", self.config.database, table))
    }
}

/// Table and database names are spliced into SQL text, so only plain
/// identifiers are accepted.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.chars().next().unwrap_or('0').is_ascii_digit()
}
