//! Adapter server
//!
//! Ties a [`Session`] to the resource and tool registries. Callers see text
//! only; failures never end the session.

use serde_json::Value;

use crate::config::Config;
use crate::resources::{ResourceRegistry, ResourceTemplate};
use crate::session::{Session, SessionError};
use crate::tools::{ToolRegistry, ToolSpec};

pub const DEFAULT_NAME: &str = "Mage.ai MCP";

#[derive(Debug)]
pub struct MageServer {
    name: String,
    session: Session,
    resources: ResourceRegistry,
    tools: ToolRegistry,
}

impl MageServer {
    pub fn start(name: impl Into<String>, config: &Config) -> Result<Self, SessionError> {
        let name = name.into();
        let session = Session::start(config)?;
        let resources = ResourceRegistry::new();
        let tools = ToolRegistry::new();

        tracing::info!(
            "{} ready: {} resources, {} tools",
            name,
            resources.templates().len(),
            tools.specs().len()
        );

        Ok(Self {
            name,
            session,
            resources,
            tools,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_templates(&self) -> &[ResourceTemplate] {
        self.resources.templates()
    }

    pub fn tool_specs(&self) -> &[ToolSpec] {
        self.tools.specs()
    }

    pub async fn read_resource(&self, uri: &str) -> String {
        self.resources.render(self.session.client(), uri).await
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> String {
        self.tools.invoke(self.session.client(), name, arguments).await
    }

    pub fn shutdown(self) {
        tracing::info!("Shutting down {}", self.name);
        self.session.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn server() -> MageServer {
        let addr = mage_mock::spawn().await.unwrap();
        MageServer::start(DEFAULT_NAME, &Config::new(mage_mock::api_url(addr))).unwrap()
    }

    #[tokio::test]
    async fn test_resources_and_tools_share_one_session() {
        let server = server().await;

        let text = server
            .call_tool(
                "update_block_content",
                json!({
                    "pipeline_uuid": "example_pipeline",
                    "block_uuid": "data_exporter",
                    "content": "print('done')"
                }),
            )
            .await;
        assert_eq!(text, "Successfully updated content for block Export Data.");

        let content = server
            .read_resource("mage://pipelines/example_pipeline/blocks/data_exporter/content")
            .await;
        assert_eq!(content, "print('done')");

        server.shutdown();
    }

    #[tokio::test]
    async fn test_failures_keep_session_usable() {
        let server = server().await;

        let text = server.call_tool("list_pipeline_blocks", json!({})).await;
        assert!(text.starts_with("Invalid arguments for list_pipeline_blocks:"));

        let text = server.read_resource("mage://pipelines/nope/blocks").await;
        assert!(text.contains("Pipeline not found"));

        let text = server.call_tool("list_all_pipelines", json!({})).await;
        assert!(text.starts_with("Available Pipelines in Mage.ai:\n\n1. Example Pipeline"));

        server.shutdown();
    }

    #[tokio::test]
    async fn test_execution_history_after_run() {
        let server = server().await;

        server
            .call_tool("execute_pipeline", json!({"pipeline_uuid": "data_processing"}))
            .await;
        let text = server
            .read_resource("pipelines/data_processing/execution")
            .await;

        assert!(text.contains("Run ID: 12345\n"));
        assert!(text.contains("Status: running\n"));
        assert!(text.contains("  - Ingest CSV (ingest_csv): running\n"));
        assert!(text.contains("  - Clean Data (clean_data): running\n"));

        server.shutdown();
    }
}
