//! Resource registry
//!
//! Read-only views addressed by path-like URIs such as
//! `mage://pipelines/{pipeline_uuid}/blocks`. The template table is plain data
//! built at construction; [`ResourceRegistry::resolve`] matches an address
//! against it segment by segment.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use mage_client::{ClientError, MageClient, endpoint};

use crate::aggregate;
use crate::render;

/// Scheme prefix accepted (and ignored) on resource addresses
pub const SCHEME: &str = "mage://";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("Failed to encode resource: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Pipelines,
    Pipeline,
    PipelineBlocks,
    Block,
    BlockContent,
    PipelineContent,
    PipelineExecution,
    BlockSearch,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceTemplate {
    pub template: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub kind: ResourceKind,
}

/// A resolved address with its parameters bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Pipelines,
    Pipeline {
        pipeline_uuid: String,
    },
    PipelineBlocks {
        pipeline_uuid: String,
    },
    Block {
        pipeline_uuid: String,
        block_uuid: String,
    },
    BlockContent {
        pipeline_uuid: String,
        block_uuid: String,
    },
    PipelineContent {
        pipeline_uuid: String,
    },
    PipelineExecution {
        pipeline_uuid: String,
    },
    BlockSearch {
        query: String,
    },
}

impl Resource {
    fn bind(kind: ResourceKind, mut params: Vec<String>) -> Self {
        // Parameters arrive in template order; pop from the back.
        let mut next = || params.pop().unwrap_or_default();
        match kind {
            ResourceKind::Pipelines => Self::Pipelines,
            ResourceKind::Pipeline => Self::Pipeline {
                pipeline_uuid: next(),
            },
            ResourceKind::PipelineBlocks => Self::PipelineBlocks {
                pipeline_uuid: next(),
            },
            ResourceKind::Block => {
                let block_uuid = next();
                Self::Block {
                    pipeline_uuid: next(),
                    block_uuid,
                }
            }
            ResourceKind::BlockContent => {
                let block_uuid = next();
                Self::BlockContent {
                    pipeline_uuid: next(),
                    block_uuid,
                }
            }
            ResourceKind::PipelineContent => Self::PipelineContent {
                pipeline_uuid: next(),
            },
            ResourceKind::PipelineExecution => Self::PipelineExecution {
                pipeline_uuid: next(),
            },
            ResourceKind::BlockSearch => Self::BlockSearch { query: next() },
        }
    }

    /// Fetch and format the resource
    pub async fn read(&self, client: &MageClient) -> Result<String> {
        match self {
            Self::Pipelines => {
                let response = client.get(&endpoint::pipelines()).await?;
                pretty(field_or(&response, "pipelines", json!([])))
            }
            Self::Pipeline { pipeline_uuid } => {
                let response = client.get(&endpoint::pipeline(pipeline_uuid)).await?;
                pretty(response)
            }
            Self::PipelineBlocks { pipeline_uuid } => {
                let response = client.get(&endpoint::blocks(pipeline_uuid)).await?;
                pretty(field_or(&response, "blocks", json!([])))
            }
            Self::Block {
                pipeline_uuid,
                block_uuid,
            } => {
                let response = client
                    .get(&endpoint::block(pipeline_uuid, block_uuid))
                    .await?;
                pretty(response)
            }
            Self::BlockContent {
                pipeline_uuid,
                block_uuid,
            } => {
                let content = client.get_block_content(pipeline_uuid, block_uuid).await?;
                Ok(content.unwrap_or_else(|| "No content found".to_string()))
            }
            Self::PipelineContent { pipeline_uuid } => {
                let pipeline = client.get_pipeline(pipeline_uuid).await?;
                let sections = aggregate::block_sections(client, pipeline_uuid).await?;
                Ok(render::pipeline_content(pipeline.as_ref(), &sections))
            }
            Self::PipelineExecution { pipeline_uuid } => {
                let reports = aggregate::execution_history(client, pipeline_uuid).await?;
                Ok(render::execution_history(pipeline_uuid, &reports))
            }
            Self::BlockSearch { query } => {
                let results = aggregate::search_blocks(client, query).await?;
                Ok(render::search_results(query, &results))
            }
        }
    }
}

fn field_or(response: &Value, key: &str, default: Value) -> Value {
    response.get(key).cloned().unwrap_or(default)
}

fn pretty(value: Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&value)?)
}

/// The table of readable resources
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    templates: Vec<ResourceTemplate>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry {
    pub fn new() -> Self {
        let json = "application/json";
        let text = "text/plain";

        let templates = vec![
            ResourceTemplate {
                template: "pipelines",
                description: "Get a list of all pipelines from Mage.ai.",
                mime_type: json,
                kind: ResourceKind::Pipelines,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}",
                description: "Get details for a specific pipeline by UUID.",
                mime_type: json,
                kind: ResourceKind::Pipeline,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}/blocks",
                description: "List all blocks in a pipeline.",
                mime_type: json,
                kind: ResourceKind::PipelineBlocks,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}/blocks/{block_uuid}",
                description: "Get details for a specific block in a pipeline.",
                mime_type: json,
                kind: ResourceKind::Block,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}/blocks/{block_uuid}/content",
                description: "Get the code content of a specific block.",
                mime_type: text,
                kind: ResourceKind::BlockContent,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}/content",
                description: "Get the entire content of a pipeline including all blocks.",
                mime_type: text,
                kind: ResourceKind::PipelineContent,
            },
            ResourceTemplate {
                template: "pipelines/{pipeline_uuid}/execution",
                description: "Get execution details for a pipeline.",
                mime_type: text,
                kind: ResourceKind::PipelineExecution,
            },
            ResourceTemplate {
                template: "blocks/search/{query}",
                description: "Search for blocks across all pipelines.",
                mime_type: text,
                kind: ResourceKind::BlockSearch,
            },
        ];

        Self { templates }
    }

    pub fn templates(&self) -> &[ResourceTemplate] {
        &self.templates
    }

    /// Match an address against the template table
    ///
    /// The `mage://` prefix is optional. Every `{param}` segment must be
    /// non-empty; literal segments must match exactly.
    pub fn resolve(&self, uri: &str) -> Result<Resource> {
        let path = uri.strip_prefix(SCHEME).unwrap_or(uri);
        let segments: Vec<&str> = path.split('/').collect();

        self.templates
            .iter()
            .find_map(|t| match_template(t.template, &segments).map(|p| Resource::bind(t.kind, p)))
            .ok_or_else(|| ResourceError::UnknownResource(uri.to_string()))
    }

    pub async fn read(&self, client: &MageClient, uri: &str) -> Result<String> {
        let resource = self.resolve(uri)?;
        tracing::debug!("Reading resource {:?}", resource);
        resource.read(client).await
    }

    /// Read a resource, rendering any failure as text
    ///
    /// Remote failures yield the service's error payload unmodified.
    pub async fn render(&self, client: &MageClient, uri: &str) -> String {
        match self.read(client, uri).await {
            Ok(text) => text,
            Err(ResourceError::Remote(e)) => {
                tracing::error!("Error reading resource {}: {}", uri, e);
                e.upstream_payload()
            }
            Err(e) => {
                tracing::warn!("{}", e);
                e.to_string()
            }
        }
    }
}

fn match_template(template: &str, segments: &[&str]) -> Option<Vec<String>> {
    let parts: Vec<&str> = template.split('/').collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (part, segment) in parts.iter().zip(segments) {
        if part.starts_with('{') && part.ends_with('}') {
            if segment.is_empty() {
                return None;
            }
            params.push(segment.to_string());
        } else if part != segment {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn client() -> MageClient {
        let addr = mage_mock::spawn().await.unwrap();
        MageClient::new(mage_mock::api_url(addr)).unwrap()
    }

    #[test]
    fn test_resolve_with_and_without_scheme() {
        let registry = ResourceRegistry::new();

        assert_eq!(
            registry.resolve("mage://pipelines").unwrap(),
            Resource::Pipelines
        );
        assert_eq!(
            registry.resolve("pipelines/etl/blocks/load/content").unwrap(),
            Resource::BlockContent {
                pipeline_uuid: "etl".to_string(),
                block_uuid: "load".to_string(),
            }
        );
        assert_eq!(
            registry.resolve("mage://pipelines/etl/blocks").unwrap(),
            Resource::PipelineBlocks {
                pipeline_uuid: "etl".to_string(),
            }
        );
        assert_eq!(
            registry.resolve("mage://pipelines/blocks").unwrap(),
            Resource::Pipeline {
                pipeline_uuid: "blocks".to_string(),
            }
        );
        assert_eq!(
            registry.resolve("blocks/search/load").unwrap(),
            Resource::BlockSearch {
                query: "load".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_addresses() {
        let registry = ResourceRegistry::new();

        for uri in ["", "runs", "pipelines/", "pipelines/etl/logs", "mage://blocks/search"] {
            assert!(
                matches!(registry.resolve(uri), Err(ResourceError::UnknownResource(_))),
                "{uri} should not resolve"
            );
        }
    }

    #[test]
    fn test_templates_are_listed() {
        let registry = ResourceRegistry::new();
        let names: Vec<_> = registry.templates().iter().map(|t| t.template).collect();

        assert_eq!(names.len(), 8);
        assert!(names.contains(&"pipelines/{pipeline_uuid}/execution"));
        assert!(names.contains(&"blocks/search/{query}"));
    }

    #[tokio::test]
    async fn test_missing_pipeline_returns_upstream_body() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "mage://pipelines/does_not_exist")
            .await;

        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, json!({"error": "Pipeline not found"}));
    }

    #[tokio::test]
    async fn test_error_body_passes_through_unchanged() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let raw = r#"{"message": "validation failed", "error": "Pipeline not found"}"#;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/pipelines/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw(raw.as_bytes(), "application/json"),
            )
            .mount(&server)
            .await;

        let client = MageClient::new(format!("{}/api/", server.uri())).unwrap();
        let text = ResourceRegistry::new()
            .render(&client, "mage://pipelines/nope")
            .await;

        assert_eq!(text, raw);
    }

    #[tokio::test]
    async fn test_pipelines_is_indented_array() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "mage://pipelines")
            .await;

        assert!(text.starts_with("[\n  {"));
        let pipelines: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(pipelines.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_pipeline_content_sections_in_order() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "mage://pipelines/example_pipeline/content")
            .await;

        assert!(text.starts_with("# Pipeline: Example Pipeline\n"));
        assert_eq!(text.matches("## Block:").count(), 3);

        let loader = text.find("## Block: Load Data").unwrap();
        let transformer = text.find("## Block: Transform Data").unwrap();
        let exporter = text.find("## Block: Export Data").unwrap();
        assert!(loader < transformer && transformer < exporter);

        assert!(text.contains("def load_data():"));
        assert!(text.contains("def transform(data, *args, **kwargs):"));
        assert!(text.contains("def export_data(data, *args, **kwargs):"));
    }

    #[tokio::test]
    async fn test_block_content_resource() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "pipelines/data_processing/blocks/ingest_csv/content")
            .await;

        assert!(text.starts_with("# CSV ingestion block"));
    }

    #[tokio::test]
    async fn test_execution_history_without_runs() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "pipelines/example_pipeline/execution")
            .await;

        assert_eq!(text, "No execution history found for this pipeline.");
    }

    #[tokio::test]
    async fn test_unknown_resource_text() {
        let client = client().await;
        let text = ResourceRegistry::new()
            .render(&client, "mage://workspaces")
            .await;

        assert_eq!(text, "Unknown resource: mage://workspaces");
    }
}
