//! Geographic aggregation over pipeline output.

use analytics::aggregate_by_location;
use etl::{EtlConfig, EtlPipeline};
use fraud_core::{columns, Dataset};
use integration_tests::fixtures::{sample_transactions, transaction};
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
async fn markers_aggregate_per_location() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    let dataset = materialized_dataset(&store).await;

    let markers = aggregate_by_location(&dataset).unwrap();
    // tx-004 has no geo data, so only two locations appear; output is
    // sorted by name.
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].location, "Recife");
    assert_eq!(markers[1].location, "Sao Paulo");

    let sao_paulo = &markers[1];
    assert_eq!(sao_paulo.count, 2);
    assert_eq!(sao_paulo.fraud_count, 1);
    assert_eq!(sao_paulo.fraud_rate, 50.0);
    assert_eq!(sao_paulo.color, "#d84315");
    assert!((sao_paulo.lat - -23.55).abs() < 1e-9);

    let recife = &markers[0];
    assert_eq!(recife.fraud_count, 0);
    assert_eq!(recife.color, "#2e7d32");
}

#[tokio::test]
async fn dataset_without_geo_columns_signals_no_result() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions("transactions", sample_transactions());
    let dataset = materialized_dataset(&store).await;

    let without_lat: Vec<&'static str> = columns::ALL
        .iter()
        .copied()
        .filter(|c| *c != columns::LATITUDE)
        .collect();
    let restricted = Dataset::with_columns(dataset.records().to_vec(), &without_lat);
    assert!(aggregate_by_location(&restricted).is_none());
}

#[tokio::test]
async fn all_rows_missing_geo_signals_no_result() {
    let store = Arc::new(MockStore::new());
    store.seed_transactions(
        "transactions",
        vec![
            transaction("tx-1", "2024-01-01T00:00:00"),
            transaction("tx-2", "2024-01-02T00:00:00"),
        ],
    );
    let dataset = materialized_dataset(&store).await;
    assert!(aggregate_by_location(&dataset).is_none());
}
