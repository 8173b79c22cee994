//! Fraudscope, the credit-card fraud analytics engine.
//!
//! Batch entry point:
//! - runs the Extract → Transform → Load pipeline against the table store
//! - reads the enriched table back and computes the dashboard aggregates
//!   (KPIs, daily trend, geo risk map, feature-importance ranking)
//! - logs the results for the rendering collaborator to pick up

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use analytics::{
    aggregate_by_location, correlation_matrix, daily_trend, importance, rank_features, KpiMemo,
};
use clickhouse_store::{CachedReader, ClickHouseClient, ClickHouseConfig};
use etl::{EtlConfig, EtlPipeline};
use fraud_core::Dataset;
use telemetry::{init_tracing_from_env, metrics};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    clickhouse: ClickHouseConfig,

    #[serde(default)]
    etl: EtlConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clickhouse: ClickHouseConfig::default(),
            etl: EtlConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Fraudscope v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Initialize ClickHouse client
    let store = Arc::new(
        ClickHouseClient::new(config.clickhouse.clone())
            .context("Failed to create ClickHouse client")?,
    );

    // Check health and update status
    if !clickhouse_store::health::refresh(&store).await {
        error!("ClickHouse connection: unhealthy");
        anyhow::bail!("table store unreachable at {}", config.clickhouse.url);
    }
    info!("ClickHouse connection: healthy");

    // Make sure the database and source table exist
    clickhouse_store::schema::init_schema(&store, &config.etl.source_table)
        .await
        .context("Failed to initialize store schema")?;

    // One ETL run: materialize the enriched table
    let pipeline = EtlPipeline::new(store.clone(), config.etl.clone());
    let report = pipeline.run().await.context("ETL run failed")?;

    if report.load_skipped {
        warn!("Source table is empty, nothing to analyze");
        return Ok(());
    }

    // Read the freshly replaced destination through the cache
    let reader = CachedReader::new(store.clone(), 8);
    reader.invalidate(&config.etl.destination_table).await;
    let rows = reader
        .read_enriched(&config.etl.destination_table)
        .await
        .context("Failed to read enriched table")?;

    let dataset = Dataset::new(rows.as_ref().clone());
    summarize(&dataset);

    info!(snapshot = ?metrics().snapshot(), "Run metrics");
    Ok(())
}

/// Compute and log the dashboard aggregates.
fn summarize(dataset: &Dataset) {
    let memo = KpiMemo::default();
    let kpis = memo.snapshot(dataset);
    info!(
        total_value = kpis.total_value,
        transactions = kpis.transaction_count,
        fraud_count = kpis.fraud_count,
        fraud_rate_pct = kpis.fraud_rate,
        fraud_value = kpis.fraud_value,
        "KPI snapshot"
    );

    let trend = daily_trend(dataset);
    if let (Some(first), Some(last)) = (trend.first(), trend.last()) {
        info!(
            days = trend.len(),
            from = %first.day,
            to = %last.day,
            "Daily trend computed"
        );
    }

    match aggregate_by_location(dataset) {
        Some(locations) => {
            info!(locations = locations.len(), "Geo aggregation complete");
            for location in locations.iter().take(5) {
                info!(marker = %location.label(), color = %location.color, "Top location");
            }
        }
        None => warn!("No geographic data to aggregate"),
    }

    let correlations = correlation_matrix(dataset);
    info!(columns = correlations.columns.len(), "Correlation matrix computed");

    let ranking = rank_features(dataset, importance::DEFAULT_SEED);
    if ranking.is_empty() {
        warn!("Feature-importance ranking skipped (degenerate target)");
    } else {
        for feature in ranking.iter().take(10) {
            info!(
                feature = %feature.feature,
                importance = feature.importance,
                "Feature importance"
            );
        }
    }
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("FRAUDSCOPE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested ClickHouse config from environment.
    // The config crate's nested parsing doesn't work reliably with
    // underscored field names.
    if let Ok(url) = std::env::var("FRAUDSCOPE_CLICKHOUSE_URL") {
        config.clickhouse.url = url;
    }
    if let Ok(database) = std::env::var("FRAUDSCOPE_CLICKHOUSE_DATABASE") {
        config.clickhouse.database = database;
    }
    if let Ok(username) = std::env::var("FRAUDSCOPE_CLICKHOUSE_USERNAME") {
        config.clickhouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("FRAUDSCOPE_CLICKHOUSE_PASSWORD") {
        config.clickhouse.password = Some(password);
    }

    // Manual overrides for the ETL table names
    if let Ok(source) = std::env::var("FRAUDSCOPE_ETL_SOURCE_TABLE") {
        config.etl.source_table = source;
    }
    if let Ok(destination) = std::env::var("FRAUDSCOPE_ETL_DESTINATION_TABLE") {
        config.etl.destination_table = destination;
    }

    Ok(config)
}
