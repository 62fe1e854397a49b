//! Run API Handlers
//!
//! Runs are recorded as `running` and never progress; the mock does not
//! execute anything.

use axum::{
    Json,
    extract::{Query, State},
};
use mage_core::dto::run::{
    BlockRunEnvelope, BlockRunList, CreateBlockRun, CreatePipelineRun, PipelineRunEnvelope,
    PipelineRunList,
};
use serde::Deserialize;

use crate::api::error::ApiResult;
use crate::store::SharedStore;

#[derive(Debug, Deserialize)]
pub struct PipelineRunQuery {
    pub pipeline_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockRunQuery {
    pub pipeline_run_id: Option<String>,
}

/// GET /api/pipeline_runs?pipeline_uuid=...
pub async fn list_pipeline_runs(
    State(store): State<SharedStore>,
    Query(query): Query<PipelineRunQuery>,
) -> Json<PipelineRunList> {
    let store = store.read().await;

    Json(PipelineRunList {
        pipeline_runs: store.pipeline_runs(query.pipeline_uuid.as_deref()),
    })
}

/// POST /api/pipeline_runs
pub async fn create_pipeline_run(
    State(store): State<SharedStore>,
    Json(req): Json<CreatePipelineRun>,
) -> ApiResult<Json<PipelineRunEnvelope>> {
    tracing::info!("Starting run of pipeline {}", req.pipeline_run.pipeline_uuid);

    let run = store
        .write()
        .await
        .create_pipeline_run(&req.pipeline_run.pipeline_uuid)?;

    Ok(Json(PipelineRunEnvelope {
        pipeline_run: Some(run),
    }))
}

/// GET /api/block_runs?pipeline_run_id=...
pub async fn list_block_runs(
    State(store): State<SharedStore>,
    Query(query): Query<BlockRunQuery>,
) -> Json<BlockRunList> {
    let store = store.read().await;

    Json(BlockRunList {
        block_runs: store.block_runs(query.pipeline_run_id.as_deref()),
    })
}

/// POST /api/block_runs
pub async fn create_block_run(
    State(store): State<SharedStore>,
    Json(req): Json<CreateBlockRun>,
) -> ApiResult<Json<BlockRunEnvelope>> {
    let target = req.block_run;
    tracing::info!(
        "Starting run of block {} in {}",
        target.block_uuid,
        target.pipeline_uuid
    );

    let run = store
        .write()
        .await
        .create_block_run(&target.pipeline_uuid, &target.block_uuid)?;

    Ok(Json(BlockRunEnvelope {
        block_run: Some(run),
    }))
}
