//! Run-related API endpoints
//!
//! Triggering a run returns as soon as the service accepts it; the client
//! never waits for completion.

use mage_core::domain::run::{BlockRun, PipelineRun, RunId};
use mage_core::dto::run::{
    BlockRunEnvelope, BlockRunList, CreateBlockRun, CreatePipelineRun, PipelineRunEnvelope,
    PipelineRunList,
};

use crate::error::Result;
use crate::{MageClient, Method, endpoint};

impl MageClient {
    // =============================================================================
    // Pipeline Runs
    // =============================================================================

    /// Trigger a pipeline run
    pub async fn trigger_pipeline_run(&self, req: &CreatePipelineRun) -> Result<Option<PipelineRun>> {
        tracing::info!("Triggering run of pipeline {}", req.pipeline_run.pipeline_uuid);

        let envelope: PipelineRunEnvelope = self
            .send_as(Method::Post, &endpoint::pipeline_runs(), req)
            .await?;
        Ok(envelope.pipeline_run)
    }

    /// List the runs of one pipeline
    pub async fn list_pipeline_runs(&self, pipeline_uuid: &str) -> Result<Vec<PipelineRun>> {
        let list: PipelineRunList = self
            .get_as(&endpoint::pipeline_runs_for(pipeline_uuid))
            .await?;
        Ok(list.pipeline_runs)
    }

    // =============================================================================
    // Block Runs
    // =============================================================================

    /// Trigger a run of a single block
    pub async fn trigger_block_run(&self, req: &CreateBlockRun) -> Result<Option<BlockRun>> {
        tracing::info!(
            "Triggering run of block {} in pipeline {}",
            req.block_run.block_uuid,
            req.block_run.pipeline_uuid
        );

        let envelope: BlockRunEnvelope = self
            .send_as(Method::Post, &endpoint::block_runs(), req)
            .await?;
        Ok(envelope.block_run)
    }

    /// List the block runs belonging to a pipeline run
    pub async fn list_block_runs(&self, pipeline_run_id: &RunId) -> Result<Vec<BlockRun>> {
        let list: BlockRunList = self
            .get_as(&endpoint::block_runs_for(pipeline_run_id))
            .await?;
        Ok(list.block_runs)
    }
}
