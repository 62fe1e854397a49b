//! Pipeline-related API endpoints

use mage_core::domain::pipeline::Pipeline;
use mage_core::dto::pipeline::{CreatePipeline, PipelineEnvelope, PipelineList};

use crate::error::Result;
use crate::{MageClient, Method, endpoint};

impl MageClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// List all pipelines
    ///
    /// # Returns
    /// A list of all pipelines, in the order the service reports them
    pub async fn list_pipelines(&self) -> Result<Vec<Pipeline>> {
        let list: PipelineList = self.get_as(&endpoint::pipelines()).await?;
        Ok(list.pipelines)
    }

    /// Get a pipeline by UUID
    ///
    /// # Returns
    /// The pipeline, or `None` if the response carried no pipeline object
    pub async fn get_pipeline(&self, pipeline_uuid: &str) -> Result<Option<Pipeline>> {
        let envelope: PipelineEnvelope = self.get_as(&endpoint::pipeline(pipeline_uuid)).await?;
        Ok(envelope.pipeline)
    }

    /// Create a new pipeline
    ///
    /// # Example
    /// ```no_run
    /// # use mage_client::MageClient;
    /// # use mage_core::dto::pipeline::{CreatePipeline, NewPipeline};
    /// # async fn example() -> mage_client::Result<()> {
    /// let client = MageClient::new("http://localhost:6789/api/")?;
    /// let pipeline = client.create_pipeline(&CreatePipeline {
    ///     pipeline: NewPipeline {
    ///         name: "nightly etl".to_string(),
    ///         description: String::new(),
    ///         pipeline_type: "python".to_string(),
    ///     },
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_pipeline(&self, req: &CreatePipeline) -> Result<Option<Pipeline>> {
        tracing::info!("Creating pipeline: {}", req.pipeline.name);

        let envelope: PipelineEnvelope = self
            .send_as(Method::Post, &endpoint::pipelines(), req)
            .await?;
        Ok(envelope.pipeline)
    }
}
