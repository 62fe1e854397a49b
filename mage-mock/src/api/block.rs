//! Block API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use mage_core::dto::block::{BlockContent, BlockEnvelope, BlockList, CreateBlock, UpdateBlock};

use crate::api::error::ApiResult;
use crate::store::SharedStore;

/// GET /api/pipelines/{pipeline_uuid}/blocks
pub async fn list_blocks(
    State(store): State<SharedStore>,
    Path(pipeline_uuid): Path<String>,
) -> ApiResult<Json<BlockList>> {
    let store = store.read().await;
    let blocks = store.blocks(&pipeline_uuid)?.to_vec();

    Ok(Json(BlockList { blocks }))
}

/// POST /api/pipelines/{pipeline_uuid}/blocks
pub async fn create_block(
    State(store): State<SharedStore>,
    Path(pipeline_uuid): Path<String>,
    Json(req): Json<CreateBlock>,
) -> ApiResult<Json<BlockEnvelope>> {
    tracing::info!("Creating block {} in {}", req.block.name, pipeline_uuid);

    let block = store.write().await.create_block(&pipeline_uuid, req.block)?;

    Ok(Json(BlockEnvelope { block: Some(block) }))
}

/// GET /api/pipelines/{pipeline_uuid}/blocks/{block_uuid}
pub async fn get_block(
    State(store): State<SharedStore>,
    Path((pipeline_uuid, block_uuid)): Path<(String, String)>,
) -> ApiResult<Json<BlockEnvelope>> {
    let store = store.read().await;
    let block = store.block(&pipeline_uuid, &block_uuid)?.clone();

    Ok(Json(BlockEnvelope { block: Some(block) }))
}

/// PUT /api/pipelines/{pipeline_uuid}/blocks/{block_uuid}
pub async fn update_block(
    State(store): State<SharedStore>,
    Path((pipeline_uuid, block_uuid)): Path<(String, String)>,
    Json(req): Json<UpdateBlock>,
) -> ApiResult<Json<BlockEnvelope>> {
    tracing::info!("Updating block {} in {}", block_uuid, pipeline_uuid);

    let block = store
        .write()
        .await
        .update_block(&pipeline_uuid, &block_uuid, req.block)?;

    Ok(Json(BlockEnvelope { block: Some(block) }))
}

/// GET /api/pipelines/{pipeline_uuid}/blocks/{block_uuid}/content
pub async fn get_block_content(
    State(store): State<SharedStore>,
    Path((pipeline_uuid, block_uuid)): Path<(String, String)>,
) -> ApiResult<Json<BlockContent>> {
    let store = store.read().await;
    let content = store.block_content(&pipeline_uuid, &block_uuid)?.to_string();

    Ok(Json(BlockContent {
        content: Some(content),
    }))
}
