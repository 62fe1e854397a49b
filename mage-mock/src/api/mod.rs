//! API Module
//!
//! HTTP API layer of the mock, mounted under `/api` like the real service.
//! Each submodule handles endpoints for a specific resource.

pub mod block;
pub mod error;
pub mod pipeline;
pub mod run;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::store::SharedStore;

/// Create the main API router with all endpoints
pub fn create_router(store: SharedStore) -> Router {
    let api = Router::new()
        // Pipeline endpoints
        .route(
            "/pipelines",
            get(pipeline::list_pipelines).post(pipeline::create_pipeline),
        )
        .route("/pipelines/{pipeline_uuid}", get(pipeline::get_pipeline))
        // Block endpoints
        .route(
            "/pipelines/{pipeline_uuid}/blocks",
            get(block::list_blocks).post(block::create_block),
        )
        .route(
            "/pipelines/{pipeline_uuid}/blocks/{block_uuid}",
            get(block::get_block).put(block::update_block),
        )
        .route(
            "/pipelines/{pipeline_uuid}/blocks/{block_uuid}/content",
            get(block::get_block_content),
        )
        // Run endpoints
        .route(
            "/pipeline_runs",
            get(run::list_pipeline_runs).post(run::create_pipeline_run),
        )
        .route("/block_runs", post(run::create_block_run).get(run::list_block_runs));

    Router::new()
        .nest("/api", api)
        .fallback(error::endpoint_not_found)
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}
