//! Mage Mock
//!
//! An in-memory stand-in for the Mage.ai REST API. It serves the endpoints
//! the adapter talks to, backed by [`store::MockStore`], so the adapter can be
//! developed and tested without a running Mage instance.

pub mod api;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::store::MockStore;

/// Serve a seeded store on an ephemeral local port
///
/// The server runs on a background task for as long as the runtime lives.
pub async fn spawn() -> std::io::Result<SocketAddr> {
    spawn_with(MockStore::seeded()).await
}

/// Serve the given store on an ephemeral local port
pub async fn spawn_with(store: MockStore) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = api::create_router(Arc::new(RwLock::new(store)));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock server stopped: {}", e);
        }
    });

    tracing::debug!("Mock Mage API listening on {}", addr);
    Ok(addr)
}

/// Base URL of the API served at `addr`
pub fn api_url(addr: SocketAddr) -> String {
    format!("http://{}/api/", addr)
}
