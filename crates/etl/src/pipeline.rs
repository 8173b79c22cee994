//! The three-stage batch pipeline: Extract → Transform → Load.
//!
//! One-shot and idempotent: re-running against an unchanged source table
//! produces an identical destination table, because Load replaces rather
//! than appends. There is no retry between stages and no rollback; an
//! Extract or Transform failure aborts the run before anything is written,
//! a Load failure leaves whatever the store managed to write.
//!
//! Concurrent runs against the same destination table are not safe and
//! must be serialized by the caller.

use crate::features;
use fraud_core::{Result, TableStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::metrics;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

/// ETL table names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Raw source table, read by Extract.
    #[serde(default = "default_source_table")]
    pub source_table: String,
    /// Enriched destination table, replaced by Load.
    #[serde(default = "default_destination_table")]
    pub destination_table: String,
}

fn default_source_table() -> String {
    "transactions".to_string()
}

fn default_destination_table() -> String {
    "analytics_dashboard".to_string()
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_table: default_source_table(),
            destination_table: default_destination_table(),
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct EtlReport {
    pub run_id: Uuid,
    pub rows_extracted: usize,
    pub rows_loaded: usize,
    /// Rows that failed advisory validation but were loaded anyway.
    pub invalid_rows: usize,
    /// True when the source was empty and Load did not execute.
    pub load_skipped: bool,
    pub elapsed: Duration,
}

/// The batch ETL pipeline over any [`TableStore`].
pub struct EtlPipeline<S> {
    store: Arc<S>,
    config: EtlConfig,
}

impl<S: TableStore> EtlPipeline<S> {
    pub fn new(store: Arc<S>, config: EtlConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run Extract → Transform → Load once.
    pub async fn run(&self) -> Result<EtlReport> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        metrics().etl_runs.inc();

        info!(
            %run_id,
            source = %self.config.source_table,
            destination = %self.config.destination_table,
            "Starting ETL run"
        );

        // Extract. Any failure aborts before Transform.
        let raw = match self.store.read_transactions(&self.config.source_table).await {
            Ok(rows) => rows,
            Err(e) => {
                metrics().etl_failures.inc();
                error!(%run_id, error = %e, "Extract failed, aborting run");
                return Err(e);
            }
        };

        let rows_extracted = raw.len();
        metrics().rows_extracted.inc_by(rows_extracted as u64);
        info!(%run_id, rows = rows_extracted, "Extract complete");

        // Empty source: Transform is a no-op and Load is skipped.
        if raw.is_empty() {
            info!(%run_id, "Source table is empty, skipping Transform and Load");
            return Ok(EtlReport {
                run_id,
                rows_extracted: 0,
                rows_loaded: 0,
                invalid_rows: 0,
                load_skipped: true,
                elapsed: started.elapsed(),
            });
        }

        // Transform.
        let enriched = match features::enrich(raw) {
            Ok(rows) => rows,
            Err(e) => {
                metrics().etl_failures.inc();
                error!(%run_id, error = %e, "Transform failed, aborting run");
                return Err(e);
            }
        };

        // Advisory validation: invalid rows are counted and logged, never
        // dropped. The destination keeps the source row count.
        let invalid_rows = enriched.iter().filter(|r| r.validate().is_err()).count();
        if invalid_rows > 0 {
            metrics().invalid_rows.inc_by(invalid_rows as u64);
            warn!(%run_id, invalid = invalid_rows, "Rows failed validation, loading anyway");
        }

        info!(%run_id, rows = enriched.len(), "Transform complete");

        // Load. A failure here is reported; nothing is rolled back.
        let rows_loaded = match self
            .store
            .replace_enriched(&self.config.destination_table, &enriched)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                metrics().etl_failures.inc();
                error!(
                    %run_id,
                    destination = %self.config.destination_table,
                    error = %e,
                    "Load failed, destination table may be partial"
                );
                return Err(e);
            }
        };

        metrics().rows_loaded.inc_by(rows_loaded as u64);

        let elapsed = started.elapsed();
        info!(
            %run_id,
            rows = rows_loaded,
            elapsed_ms = elapsed.as_millis() as u64,
            "ETL run complete"
        );

        Ok(EtlReport {
            run_id,
            rows_extracted,
            rows_loaded,
            invalid_rows,
            load_skipped: false,
            elapsed,
        })
    }
}
