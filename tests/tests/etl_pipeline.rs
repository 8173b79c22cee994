//! End-to-end ETL pipeline behavior against the mock store.

use etl::{EtlConfig, EtlPipeline};
use fraud_core::{Error, TableStore};
use integration_tests::fixtures::{sample_transactions, transaction};
use integration_tests::mocks::MockStore;
use std::sync::Arc;

fn pipeline(store: &Arc<MockStore>) -> EtlPipeline<MockStore> {
    EtlPipeline::new(store.clone(), EtlConfig::default())
}

#[tokio::test]
async fn run_materializes_the_enriched_table() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());

    let report = pipeline(&store).run().await.unwrap();
    assert_eq!(report.rows_extracted, 4);
    assert_eq!(report.rows_loaded, 4);
    assert!(!report.load_skipped);
    assert_eq!(report.invalid_rows, 0);

    let rows = store.enriched_table("analytics_dashboard").unwrap();
    assert_eq!(rows.len(), 4);

    // Row order mirrors the source; derived fields come from the timestamp.
    let first = &rows[0];
    assert_eq!(first.transaction_id, "tx-001");
    assert_eq!(first.hour_of_day, 15);
    assert_eq!(first.weekday, 0); // 2024-01-01 is a Monday
    assert_eq!(first.month, 1);
}

#[tokio::test]
async fn extract_failure_aborts_without_writing() {
    let store = Arc::new(MockStore::new());
    // No source table seeded at all.
    let err = pipeline(&store).run().await.unwrap_err();
    assert!(matches!(err, Error::TableNotFound(_)));
    assert_eq!(store.write_count(), 0);
    assert!(store.enriched_table("analytics_dashboard").is_none());
}

#[tokio::test]
async fn unreachable_store_surfaces_connection_error() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    store.set_fail_connection(true);

    let err = pipeline(&store).run().await.unwrap_err();
    assert!(err.is_connection());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn empty_source_skips_load() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", vec![]);

    let report = pipeline(&store).run().await.unwrap();
    assert!(report.load_skipped);
    assert_eq!(report.rows_loaded, 0);
    assert_eq!(store.write_count(), 0);
    assert!(store.enriched_table("analytics_dashboard").is_none());
}

#[tokio::test]
async fn rerun_is_idempotent() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());

    let p = pipeline(&store);
    p.run().await.unwrap();
    let first = store.enriched_table("analytics_dashboard").unwrap();

    p.run().await.unwrap();
    let second = store.enriched_table("analytics_dashboard").unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn rerun_replaces_a_stale_destination() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());

    // A leftover destination from some earlier run.
    let stale = {
        let raw = transaction("stale-row", "2020-06-06T06:06:06");
        etl::enrich(vec![raw]).unwrap()
    };
    store.seed_enriched("analytics_dashboard", stale);

    pipeline(&store).run().await.unwrap();
    let rows = store.enriched_table("analytics_dashboard").unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.transaction_id != "stale-row"));
}

#[tokio::test]
async fn bad_timestamp_aborts_before_load() {
    let store = Arc::new(MockStore::new());
    let mut rows = sample_transactions();
    rows.push(transaction("tx-bad", "01/01/2024 3pm"));
    store.seed_transactions("transactions", rows);

    let err = pipeline(&store).run().await.unwrap_err();
    assert!(matches!(err, Error::Timestamp { .. }));
    assert!(err.to_string().contains("tx-bad"));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn load_failure_is_reported() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    store.set_fail_writes(true);

    let err = pipeline(&store).run().await.unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

#[tokio::test]
async fn invalid_rows_are_loaded_and_counted() {
    let store = Arc::new(MockStore::new());
    let mut rows = sample_transactions();
    // Risk score outside [0, 1]: advisory validation flags it, the load
    // keeps it.
    rows[0].risk_score = 7.5;
    store.seed_transactions("transactions", rows);

    let report = pipeline(&store).run().await.unwrap();
    assert_eq!(report.invalid_rows, 1);
    assert_eq!(report.rows_loaded, 4);
    let stored = store.enriched_table("analytics_dashboard").unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].risk_score, 7.5);
}

#[tokio::test]
async fn label_coercion_happens_during_transform() {
    let store = Arc::new(MockStore::new());
    let mut rows = sample_transactions();
    rows[3].fraud_label = 9;
    store.seed_transactions("transactions", rows);

    pipeline(&store).run().await.unwrap();
    let stored = store.enriched_table("analytics_dashboard").unwrap();
    assert_eq!(stored[3].fraud_label, 1);
}

#[tokio::test]
async fn custom_table_names_are_honored() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("raw_2024", sample_transactions());

    let config = EtlConfig {
        source_table: "raw_2024".into(),
        destination_table: "enriched_2024".into(),
    };
    EtlPipeline::new(store.clone(), config).run().await.unwrap();

    assert!(store.enriched_table("enriched_2024").is_some());
    assert!(store.enriched_table("analytics_dashboard").is_none());
    // The seeding path is also exercised through the trait.
    store
        .insert_transactions("raw_2024", &[transaction("tx-extra", "2024-02-01T00:00:00")])
        .await
        .unwrap();
    assert_eq!(store.read_transactions("raw_2024").await.unwrap().len(), 5);
}
