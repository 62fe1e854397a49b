//! Tool registry
//!
//! Named operations the assistant can invoke. Each tool is a plain async
//! function taking the client explicitly and returning a typed result;
//! [`ToolRegistry::invoke`] is the only place where results and errors become
//! text.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use mage_client::{ClientError, MageClient};
use mage_core::domain::block::Block;
use mage_core::domain::pipeline::Pipeline;
use mage_core::domain::run::{BlockRun, PipelineRun};
use mage_core::dto::block::{BlockPatch, CreateBlock, NewBlock, UpdateBlock};
use mage_core::dto::pipeline::{CreatePipeline, NewPipeline};
use mage_core::dto::run::{BlockRunTarget, CreateBlockRun, CreatePipelineRun, PipelineRunTarget};

use crate::aggregate::{self, BlockSection};
use crate::render;

/// Errors a tool can end with
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("No pipeline found with UUID: {0}")]
    PipelineNotFound(String),

    #[error("Block with UUID {block_uuid} not found in pipeline {pipeline_uuid}.")]
    BlockNotFound {
        pipeline_uuid: String,
        block_uuid: String,
    },

    /// A successful response that did not carry the expected object
    #[error("{0}")]
    MissingObject(&'static str),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// Pipeline metadata with its block summary
#[derive(Debug, Clone)]
pub struct PipelineDetails {
    pub pipeline: Pipeline,
    pub blocks: Vec<Block>,
}

/// Block metadata with its code
#[derive(Debug, Clone)]
pub struct BlockSource {
    pub block: Block,
    pub content: Option<String>,
}

/// Pipeline metadata with every block's code, in block order
#[derive(Debug)]
pub struct PipelineCode {
    pub pipeline: Pipeline,
    pub sections: Vec<BlockSection>,
}

// =============================================================================
// Tools
// =============================================================================

pub async fn list_all_pipelines(client: &MageClient) -> Result<Vec<Pipeline>> {
    Ok(client.list_pipelines().await?)
}

pub async fn get_pipeline_details(
    client: &MageClient,
    pipeline_uuid: &str,
) -> Result<PipelineDetails> {
    let pipeline = client
        .get_pipeline(pipeline_uuid)
        .await?
        .ok_or_else(|| ToolError::PipelineNotFound(pipeline_uuid.to_string()))?;
    let blocks = client.list_blocks(pipeline_uuid).await?;

    Ok(PipelineDetails { pipeline, blocks })
}

pub async fn list_pipeline_blocks(client: &MageClient, pipeline_uuid: &str) -> Result<Vec<Block>> {
    Ok(client.list_blocks(pipeline_uuid).await?)
}

/// Block metadata, then content; a missing metadata object renders as an
/// unnamed block rather than failing
pub async fn get_block_content(
    client: &MageClient,
    pipeline_uuid: &str,
    block_uuid: &str,
) -> Result<BlockSource> {
    let block = client
        .get_block(pipeline_uuid, block_uuid)
        .await?
        .unwrap_or_default();
    let content = client.get_block_content(pipeline_uuid, block_uuid).await?;

    Ok(BlockSource { block, content })
}

pub async fn create_pipeline(
    client: &MageClient,
    name: &str,
    description: &str,
    pipeline_type: &str,
) -> Result<Pipeline> {
    let req = CreatePipeline {
        pipeline: NewPipeline {
            name: name.to_string(),
            description: description.to_string(),
            pipeline_type: pipeline_type.to_string(),
        },
    };

    let pipeline = client
        .create_pipeline(&req)
        .await?
        .ok_or(ToolError::MissingObject("Failed to create pipeline."))?;

    tracing::info!("Created pipeline {}", pipeline.uuid);
    Ok(pipeline)
}

pub async fn create_block(client: &MageClient, pipeline_uuid: &str, block: NewBlock) -> Result<Block> {
    let req = CreateBlock { block };

    let block = client
        .create_block(pipeline_uuid, &req)
        .await?
        .ok_or(ToolError::MissingObject("Failed to create block."))?;

    tracing::info!("Created block {} in {}", block.uuid, pipeline_uuid);
    Ok(block)
}

/// Replace a block's code, keeping its current name
///
/// The block is fetched first; when the service has no such block the update
/// is not attempted.
pub async fn update_block_content(
    client: &MageClient,
    pipeline_uuid: &str,
    block_uuid: &str,
    content: &str,
) -> Result<Block> {
    let existing = client
        .get_block(pipeline_uuid, block_uuid)
        .await?
        .ok_or_else(|| ToolError::BlockNotFound {
            pipeline_uuid: pipeline_uuid.to_string(),
            block_uuid: block_uuid.to_string(),
        })?;

    let req = UpdateBlock {
        block: BlockPatch {
            content: Some(content.to_string()),
            name: Some(existing.name),
        },
    };

    let updated = client
        .update_block(pipeline_uuid, block_uuid, &req)
        .await?
        .ok_or(ToolError::MissingObject("Failed to update block content."))?;

    tracing::info!("Updated content of block {} in {}", block_uuid, pipeline_uuid);
    Ok(updated)
}

/// Trigger a pipeline run; returns as soon as the service accepted it
pub async fn execute_pipeline(client: &MageClient, pipeline_uuid: &str) -> Result<PipelineRun> {
    let req = CreatePipelineRun {
        pipeline_run: PipelineRunTarget {
            pipeline_uuid: pipeline_uuid.to_string(),
        },
    };

    let run = client
        .trigger_pipeline_run(&req)
        .await?
        .ok_or(ToolError::MissingObject("Failed to execute pipeline."))?;

    tracing::info!("Started run {} of pipeline {}", run.id, pipeline_uuid);
    Ok(run)
}

/// Trigger a single block run; returns as soon as the service accepted it
pub async fn execute_block(
    client: &MageClient,
    pipeline_uuid: &str,
    block_uuid: &str,
) -> Result<BlockRun> {
    let req = CreateBlockRun {
        block_run: BlockRunTarget {
            pipeline_uuid: pipeline_uuid.to_string(),
            block_uuid: block_uuid.to_string(),
        },
    };

    let run = client
        .trigger_block_run(&req)
        .await?
        .ok_or(ToolError::MissingObject("Failed to execute block."))?;

    tracing::info!(
        "Started run {} of block {} in {}",
        run.id,
        block_uuid,
        pipeline_uuid
    );
    Ok(run)
}

pub async fn get_pipeline_code(client: &MageClient, pipeline_uuid: &str) -> Result<PipelineCode> {
    let pipeline = client
        .get_pipeline(pipeline_uuid)
        .await?
        .ok_or_else(|| ToolError::PipelineNotFound(pipeline_uuid.to_string()))?;
    let sections = aggregate::block_sections(client, pipeline_uuid).await?;

    Ok(PipelineCode { pipeline, sections })
}

// =============================================================================
// Dispatch
// =============================================================================

fn default_pipeline_type() -> String {
    "python".to_string()
}

fn default_language() -> String {
    "python".to_string()
}

/// A parsed tool invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    ListAllPipelines {},
    GetPipelineDetails {
        pipeline_uuid: String,
    },
    ListPipelineBlocks {
        pipeline_uuid: String,
    },
    GetBlockContent {
        pipeline_uuid: String,
        block_uuid: String,
    },
    CreatePipeline {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default = "default_pipeline_type")]
        pipeline_type: String,
    },
    CreateBlock {
        pipeline_uuid: String,
        name: String,
        block_type: String,
        #[serde(default = "default_language")]
        language: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        upstream_blocks: Vec<String>,
    },
    UpdateBlockContent {
        pipeline_uuid: String,
        block_uuid: String,
        content: String,
    },
    ExecutePipeline {
        pipeline_uuid: String,
    },
    ExecuteBlock {
        pipeline_uuid: String,
        block_uuid: String,
    },
    GetPipelineCode {
        pipeline_uuid: String,
    },
}

/// Typed result of a tool call, rendered only at the boundary
#[derive(Debug)]
pub enum ToolOutput {
    Pipelines(Vec<Pipeline>),
    PipelineDetails(PipelineDetails),
    Blocks {
        pipeline_uuid: String,
        blocks: Vec<Block>,
    },
    BlockSource(BlockSource),
    CreatedPipeline(Pipeline),
    CreatedBlock(Block),
    UpdatedBlock(Block),
    PipelineRun {
        pipeline_uuid: String,
        run: PipelineRun,
    },
    BlockRun {
        pipeline_uuid: String,
        block_uuid: String,
        run: BlockRun,
    },
    PipelineCode(PipelineCode),
}

impl ToolOutput {
    pub fn render(&self) -> String {
        match self {
            Self::Pipelines(pipelines) => render::pipeline_list(pipelines),
            Self::PipelineDetails(details) => render::pipeline_details(details),
            Self::Blocks {
                pipeline_uuid,
                blocks,
            } => render::block_list(pipeline_uuid, blocks),
            Self::BlockSource(source) => render::block_source(source),
            Self::CreatedPipeline(pipeline) => render::created_pipeline(pipeline),
            Self::CreatedBlock(block) => render::created_block(block),
            Self::UpdatedBlock(block) => render::updated_block(block),
            Self::PipelineRun { pipeline_uuid, run } => {
                render::pipeline_run_started(pipeline_uuid, run)
            }
            Self::BlockRun {
                pipeline_uuid,
                block_uuid,
                run,
            } => render::block_run_started(pipeline_uuid, block_uuid, run),
            Self::PipelineCode(code) => render::pipeline_code(&code.pipeline, &code.sections),
        }
    }
}

impl ToolCall {
    /// Parse `arguments` for the tool called `name`
    ///
    /// A null `arguments` value is treated as an empty object.
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };

        serde_json::from_value(json!({ "name": name, "arguments": arguments })).map_err(|e| {
            ToolError::InvalidArguments {
                tool: name.to_string(),
                message: e.to_string(),
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListAllPipelines {} => "list_all_pipelines",
            Self::GetPipelineDetails { .. } => "get_pipeline_details",
            Self::ListPipelineBlocks { .. } => "list_pipeline_blocks",
            Self::GetBlockContent { .. } => "get_block_content",
            Self::CreatePipeline { .. } => "create_pipeline",
            Self::CreateBlock { .. } => "create_block",
            Self::UpdateBlockContent { .. } => "update_block_content",
            Self::ExecutePipeline { .. } => "execute_pipeline",
            Self::ExecuteBlock { .. } => "execute_block",
            Self::GetPipelineCode { .. } => "get_pipeline_code",
        }
    }

    /// What the tool is doing, as used in error reports
    pub fn activity(&self) -> &'static str {
        match self {
            Self::ListAllPipelines {} => "listing pipelines",
            Self::GetPipelineDetails { .. } => "getting pipeline details",
            Self::ListPipelineBlocks { .. } => "listing pipeline blocks",
            Self::GetBlockContent { .. } => "getting block content",
            Self::CreatePipeline { .. } => "creating pipeline",
            Self::CreateBlock { .. } => "creating block",
            Self::UpdateBlockContent { .. } => "updating block content",
            Self::ExecutePipeline { .. } => "executing pipeline",
            Self::ExecuteBlock { .. } => "executing block",
            Self::GetPipelineCode { .. } => "retrieving pipeline code",
        }
    }

    pub async fn execute(self, client: &MageClient) -> Result<ToolOutput> {
        let output = match self {
            Self::ListAllPipelines {} => ToolOutput::Pipelines(list_all_pipelines(client).await?),
            Self::GetPipelineDetails { pipeline_uuid } => {
                ToolOutput::PipelineDetails(get_pipeline_details(client, &pipeline_uuid).await?)
            }
            Self::ListPipelineBlocks { pipeline_uuid } => {
                let blocks = list_pipeline_blocks(client, &pipeline_uuid).await?;
                ToolOutput::Blocks {
                    pipeline_uuid,
                    blocks,
                }
            }
            Self::GetBlockContent {
                pipeline_uuid,
                block_uuid,
            } => ToolOutput::BlockSource(
                get_block_content(client, &pipeline_uuid, &block_uuid).await?,
            ),
            Self::CreatePipeline {
                name,
                description,
                pipeline_type,
            } => ToolOutput::CreatedPipeline(
                create_pipeline(client, &name, &description, &pipeline_type).await?,
            ),
            Self::CreateBlock {
                pipeline_uuid,
                name,
                block_type,
                language,
                content,
                upstream_blocks,
            } => {
                let block = NewBlock {
                    name,
                    block_type,
                    language,
                    content,
                    upstream_blocks,
                };
                ToolOutput::CreatedBlock(create_block(client, &pipeline_uuid, block).await?)
            }
            Self::UpdateBlockContent {
                pipeline_uuid,
                block_uuid,
                content,
            } => ToolOutput::UpdatedBlock(
                update_block_content(client, &pipeline_uuid, &block_uuid, &content).await?,
            ),
            Self::ExecutePipeline { pipeline_uuid } => {
                let run = execute_pipeline(client, &pipeline_uuid).await?;
                ToolOutput::PipelineRun { pipeline_uuid, run }
            }
            Self::ExecuteBlock {
                pipeline_uuid,
                block_uuid,
            } => {
                let run = execute_block(client, &pipeline_uuid, &block_uuid).await?;
                ToolOutput::BlockRun {
                    pipeline_uuid,
                    block_uuid,
                    run,
                }
            }
            Self::GetPipelineCode { pipeline_uuid } => {
                ToolOutput::PipelineCode(get_pipeline_code(client, &pipeline_uuid).await?)
            }
        };

        Ok(output)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// One tool parameter as advertised to the caller
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ParamSpec {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            param_type: "string",
            default: None,
        }
    }

    const fn optional(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            param_type: "string",
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

/// The table of invokable tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        use ParamSpec as P;

        let pipeline = P::required("pipeline_uuid");
        let block = P::required("block_uuid");

        let specs = vec![
            ToolSpec {
                name: "list_all_pipelines",
                description: "List all available pipelines in Mage.ai.",
                params: vec![],
            },
            ToolSpec {
                name: "get_pipeline_details",
                description: "Get detailed information about a specific pipeline.",
                params: vec![pipeline.clone()],
            },
            ToolSpec {
                name: "list_pipeline_blocks",
                description: "List all blocks in a specific pipeline.",
                params: vec![pipeline.clone()],
            },
            ToolSpec {
                name: "get_block_content",
                description: "Get the code content of a specific block in a pipeline.",
                params: vec![pipeline.clone(), block.clone()],
            },
            ToolSpec {
                name: "create_pipeline",
                description: "Create a new pipeline in Mage.ai.",
                params: vec![
                    P::required("name"),
                    P::optional("description", ""),
                    P::optional("pipeline_type", "python"),
                ],
            },
            ToolSpec {
                name: "create_block",
                description: "Create a new block in a pipeline.",
                params: vec![
                    pipeline.clone(),
                    P::required("name"),
                    P::required("block_type"),
                    P::optional("language", "python"),
                    P::optional("content", ""),
                    ParamSpec {
                        name: "upstream_blocks",
                        param_type: "array",
                        default: Some("[]"),
                    },
                ],
            },
            ToolSpec {
                name: "update_block_content",
                description: "Update the content of an existing block.",
                params: vec![pipeline.clone(), block.clone(), P::required("content")],
            },
            ToolSpec {
                name: "execute_pipeline",
                description: "Execute a pipeline.",
                params: vec![pipeline.clone()],
            },
            ToolSpec {
                name: "execute_block",
                description: "Execute a single block in a pipeline.",
                params: vec![pipeline.clone(), block],
            },
            ToolSpec {
                name: "get_pipeline_code",
                description: "Get the complete code of a pipeline including all blocks.",
                params: vec![pipeline],
            },
        ];

        Self { specs }
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Run the tool called `name`, always producing text
    pub async fn invoke(&self, client: &MageClient, name: &str, arguments: Value) -> String {
        if self.get(name).is_none() {
            tracing::warn!("Unknown tool requested: {}", name);
            return ToolError::UnknownTool(name.to_string()).to_string();
        }

        let call = match ToolCall::parse(name, arguments) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!("{}", e);
                return e.to_string();
            }
        };

        let activity = call.activity();
        tracing::debug!("Invoking tool {}", name);

        match call.execute(client).await {
            Ok(output) => output.render(),
            Err(e) => {
                tracing::error!("Error in {}: {}", name, e);
                render::tool_error(activity, &e)
            }
        }
    }
}
