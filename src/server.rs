//! HTTP Server
//!
//! Wires the storage handlers into an axum router and runs it.

use crate::storage::handlers::{handle_append, handle_get, handle_put, handle_stats};
use crate::storage::memory::KvStore;
use crate::storage::protocol::{ENDPOINT_APPEND, ENDPOINT_GET, ENDPOINT_PUT, ENDPOINT_STATS};

use anyhow::Result;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub fn router(store: Arc<KvStore>) -> Router {
    Router::new()
        .route(ENDPOINT_GET, post(handle_get))
        .route(ENDPOINT_PUT, post(handle_put))
        .route(ENDPOINT_APPEND, post(handle_append))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(Extension(store))
}

/// Serves `store` on an already bound listener until the server stops.
pub async fn serve(listener: TcpListener, store: Arc<KvStore>) -> Result<()> {
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(store)).await?;
    Ok(())
}

/// Logs store counters every `interval`. Runs forever; spawn it.
pub async fn report_stats(store: Arc<KvStore>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        let stats = store.stats().await;
        tracing::info!(
            "Store stats: {} keys, {} tracked clients",
            stats.keys,
            stats.clients
        );
    }
}
