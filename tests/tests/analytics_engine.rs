//! Aggregation over pipeline output, and caching behavior.

use analytics::{compute_kpis, identify_outliers, profile_column, ColumnProfile, KpiMemo};
use clickhouse_store::CachedReader;
use etl::{EtlConfig, EtlPipeline};
use fraud_core::{columns, Dataset};
use integration_tests::fixtures::{located_transaction, sample_transactions};
use integration_tests::mocks::MockStore;
use std::sync::Arc;

async fn materialized_dataset(store: &Arc<MockStore>) -> Dataset {
    EtlPipeline::new(store.clone(), EtlConfig::default())
        .run()
        .await
        .unwrap();
    Dataset::new(store.enriched_table("analytics_dashboard").unwrap())
}

#[tokio::test]
async fn kpis_over_pipeline_output() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    let dataset = materialized_dataset(&store).await;

    let kpis = compute_kpis(&dataset);
    assert_eq!(kpis.transaction_count, 4);
    assert_eq!(kpis.fraud_count, 1);
    assert_eq!(kpis.fraud_rate, 25.0);
    assert_eq!(kpis.total_value, 550.0);
    assert!((kpis.mean_risk_fraud - 0.9).abs() < 1e-12);
}

#[tokio::test]
async fn profiles_and_outliers_over_pipeline_output() {
    let store = Arc::new(MockStore::new());
    let mut rows = sample_transactions();
    for i in 0..20 {
        rows.push(located_transaction(
            &format!("tx-fill-{i}"),
            "2024-01-05T10:00:00",
            "Recife",
            -8.05,
            -34.90,
            0,
        ));
    }
    // One extreme ticket.
    rows[3].amount = 50_000.0;
    store.seed_transactions("transactions", rows);
    let dataset = materialized_dataset(&store).await;

    let report = identify_outliers(&dataset, columns::AMOUNT);
    assert_eq!(report.count, 1);
    assert_eq!(report.records[0].transaction_id, "tx-004");

    let Some(ColumnProfile::Categorical(profile)) =
        profile_column(&dataset, columns::LOCATION)
    else {
        panic!("expected a categorical profile");
    };
    assert_eq!(profile.mode.as_deref(), Some("Recife"));
    assert_eq!(profile.distinct, 2);
}

#[tokio::test]
async fn cached_reader_serves_repeat_reads_from_memory() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    EtlPipeline::new(store.clone(), EtlConfig::default())
        .run()
        .await
        .unwrap();
    let reads_after_etl = store.read_count();

    let reader = CachedReader::new(store.clone(), 8);
    let first = reader.read_enriched("analytics_dashboard").await.unwrap();
    let second = reader.read_enriched("analytics_dashboard").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.read_count(), reads_after_etl + 1);

    // Invalidation forces the next read back to the store.
    reader.invalidate("analytics_dashboard").await;
    reader.read_enriched("analytics_dashboard").await.unwrap();
    assert_eq!(store.read_count(), reads_after_etl + 2);
}

#[tokio::test]
async fn cached_reader_does_not_cache_failures() {
    let store = Arc::new(MockStore::new());
    let reader = CachedReader::new(store.clone(), 8);

    assert!(reader.read_enriched("missing").await.is_err());

    // Table appears later; the reader must pick it up.
    store.seed_enriched("missing", vec![]);
    assert!(reader.read_enriched("missing").await.is_ok());
}

#[tokio::test]
async fn kpi_memo_hits_on_identical_input() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    let dataset = materialized_dataset(&store).await;

    let memo = KpiMemo::new(8);
    let first = memo.snapshot(&dataset);
    let second = memo.snapshot(&dataset);
    assert_eq!(first, second);

    // A different subset is a different key.
    let subset = Dataset::new(dataset.records()[..2].to_vec());
    let third = memo.snapshot(&subset);
    assert_eq!(third.transaction_count, 2);
}
