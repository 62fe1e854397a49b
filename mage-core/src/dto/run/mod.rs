//! Run DTOs

use serde::{Deserialize, Serialize};

use crate::domain::run::{BlockRun, PipelineRun};

/// Request to trigger a pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePipelineRun {
    #[serde(default)]
    pub pipeline_run: PipelineRunTarget,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRunTarget {
    pub pipeline_uuid: String,
}

/// Request to trigger a single block run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlockRun {
    #[serde(default)]
    pub block_run: BlockRunTarget,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRunTarget {
    pub pipeline_uuid: String,
    pub block_uuid: String,
}

/// `{"pipeline_runs": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRunList {
    pub pipeline_runs: Vec<PipelineRun>,
}

/// `{"pipeline_run": {...}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRunEnvelope {
    pub pipeline_run: Option<PipelineRun>,
}

/// `{"block_runs": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRunList {
    pub block_runs: Vec<BlockRun>,
}

/// `{"block_run": {...}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRunEnvelope {
    pub block_run: Option<BlockRun>,
}
