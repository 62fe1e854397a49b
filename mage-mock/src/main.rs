//! Mock Mage API server for local development
//!
//! Serves a seeded in-memory store on `MAGE_MOCK_BIND_ADDR`
//! (default `0.0.0.0:6789`), so `http://localhost:6789/api/` works as the
//! adapter's base URL.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mage_mock::api;
use mage_mock::store::MockStore;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mage_mock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = MockStore::seeded();
    tracing::info!(
        "Seeded mock with {} pipelines",
        store.pipelines().len()
    );
    let app = api::create_router(Arc::new(RwLock::new(store)));

    let addr =
        std::env::var("MAGE_MOCK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:6789".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Mock Mage API listening on {}/api/", listener.local_addr()?);

    axum::serve(listener, app).await
}
