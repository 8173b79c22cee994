//! ClickHouse health checks.

use crate::client::ClickHouseClient;
use telemetry::health;
use tracing::{debug, error};

/// Check ClickHouse connection health.
pub async fn check_connection(client: &ClickHouseClient) -> bool {
    match client.inner().query("SELECT 1").fetch_one::<u8>().await {
        Ok(_) => {
            debug!("ClickHouse connection healthy");
            true
        }
        Err(e) => {
            error!("ClickHouse health check failed: {}", e);
            false
        }
    }
}

/// Probe the store and record the result in the health registry.
pub async fn refresh(client: &ClickHouseClient) -> bool {
    let healthy = check_connection(client).await;
    if healthy {
        health().store.set_healthy();
    } else {
        health().store.set_unhealthy("SELECT 1 probe failed");
    }
    healthy
}
