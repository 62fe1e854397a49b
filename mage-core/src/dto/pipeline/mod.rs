//! Pipeline DTOs

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::Pipeline;

/// Request to create a new pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePipeline {
    #[serde(default)]
    pub pipeline: NewPipeline,
}

/// Attributes of a pipeline to be created
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPipeline {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub pipeline_type: String,
}

/// `{"pipelines": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineList {
    pub pipelines: Vec<Pipeline>,
}

/// `{"pipeline": {...}}`
///
/// `pipeline` is `None` when the service answered without the object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineEnvelope {
    pub pipeline: Option<Pipeline>,
}
