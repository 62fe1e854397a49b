//! Block-related API endpoints

use mage_core::domain::block::Block;
use mage_core::dto::block::{BlockContent, BlockEnvelope, BlockList, CreateBlock, UpdateBlock};

use crate::error::Result;
use crate::{MageClient, Method, endpoint};

impl MageClient {
    // =============================================================================
    // Block Query
    // =============================================================================

    /// List the blocks of a pipeline, in pipeline order
    pub async fn list_blocks(&self, pipeline_uuid: &str) -> Result<Vec<Block>> {
        let list: BlockList = self.get_as(&endpoint::blocks(pipeline_uuid)).await?;
        Ok(list.blocks)
    }

    /// Get a block's metadata
    ///
    /// # Returns
    /// The block, or `None` if the response carried no block object
    pub async fn get_block(&self, pipeline_uuid: &str, block_uuid: &str) -> Result<Option<Block>> {
        let envelope: BlockEnvelope = self
            .get_as(&endpoint::block(pipeline_uuid, block_uuid))
            .await?;
        Ok(envelope.block)
    }

    /// Get a block's code content
    pub async fn get_block_content(
        &self,
        pipeline_uuid: &str,
        block_uuid: &str,
    ) -> Result<Option<String>> {
        let content: BlockContent = self
            .get_as(&endpoint::block_content(pipeline_uuid, block_uuid))
            .await?;
        Ok(content.content)
    }

    // =============================================================================
    // Block Management
    // =============================================================================

    /// Create a block inside a pipeline
    pub async fn create_block(&self, pipeline_uuid: &str, req: &CreateBlock) -> Result<Option<Block>> {
        tracing::info!("Creating block {} in pipeline {}", req.block.name, pipeline_uuid);

        let envelope: BlockEnvelope = self
            .send_as(Method::Post, &endpoint::blocks(pipeline_uuid), req)
            .await?;
        Ok(envelope.block)
    }

    /// Update an existing block
    pub async fn update_block(
        &self,
        pipeline_uuid: &str,
        block_uuid: &str,
        req: &UpdateBlock,
    ) -> Result<Option<Block>> {
        tracing::info!("Updating block {} in pipeline {}", block_uuid, pipeline_uuid);

        let envelope: BlockEnvelope = self
            .send_as(Method::Put, &endpoint::block(pipeline_uuid, block_uuid), req)
            .await?;
        Ok(envelope.block)
    }
}
