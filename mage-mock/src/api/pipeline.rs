//! Pipeline API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use mage_core::dto::pipeline::{CreatePipeline, PipelineEnvelope, PipelineList};

use crate::api::error::ApiResult;
use crate::store::SharedStore;

/// GET /api/pipelines
pub async fn list_pipelines(State(store): State<SharedStore>) -> Json<PipelineList> {
    tracing::debug!("Listing all pipelines");

    let store = store.read().await;
    Json(PipelineList {
        pipelines: store.pipelines().to_vec(),
    })
}

/// GET /api/pipelines/{pipeline_uuid}
pub async fn get_pipeline(
    State(store): State<SharedStore>,
    Path(pipeline_uuid): Path<String>,
) -> ApiResult<Json<PipelineEnvelope>> {
    tracing::debug!("Getting pipeline: {}", pipeline_uuid);

    let store = store.read().await;
    let pipeline = store.pipeline(&pipeline_uuid)?.clone();

    Ok(Json(PipelineEnvelope {
        pipeline: Some(pipeline),
    }))
}

/// POST /api/pipelines
pub async fn create_pipeline(
    State(store): State<SharedStore>,
    Json(req): Json<CreatePipeline>,
) -> ApiResult<Json<PipelineEnvelope>> {
    tracing::info!("Creating pipeline: {}", req.pipeline.name);

    let pipeline = store.write().await.create_pipeline(req.pipeline)?;

    Ok(Json(PipelineEnvelope {
        pipeline: Some(pipeline),
    }))
}
