//! Commands module
//!
//! Defines the CLI subcommands and their handlers. Every handler works
//! against an already started [`MageServer`].

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mage_mcp::MageServer;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the resource templates
    Resources,
    /// List the tools and their parameters
    Tools,
    /// Read one resource (e.g. mage://pipelines/example_pipeline/blocks)
    Read {
        /// Resource address, with or without the mage:// prefix
        uri: String,
    },
    /// Invoke one tool
    Call {
        /// Tool name (e.g. list_all_pipelines)
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// Answer JSON requests read line by line from stdin
    Serve,
}

/// One line of `serve` input
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum Request {
    Resource {
        resource: String,
    },
    Tool {
        tool: String,
        #[serde(default)]
        arguments: Value,
    },
}

/// One line of `serve` output
#[derive(Debug, Serialize)]
struct Reply {
    text: String,
}

pub async fn handle_command(command: Commands, server: &MageServer) -> Result<()> {
    match command {
        Commands::Resources => {
            println!(
                "{}",
                serde_json::to_string_pretty(server.resource_templates())?
            );
            Ok(())
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(server.tool_specs())?);
            Ok(())
        }
        Commands::Read { uri } => {
            println!("{}", server.read_resource(&uri).await);
            Ok(())
        }
        Commands::Call { name, args } => {
            let arguments: Value =
                serde_json::from_str(&args).context("Tool arguments must be valid JSON")?;
            println!("{}", server.call_tool(&name, arguments).await);
            Ok(())
        }
        Commands::Serve => serve(server).await,
    }
}

/// Read requests from stdin until EOF, one reply line per request line
async fn serve(server: &MageServer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!("{} serving on stdin", server.name());

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let text = answer(server, &line).await;
        let mut reply = serde_json::to_string(&Reply { text })?;
        reply.push('\n');

        stdout
            .write_all(reply.as_bytes())
            .await
            .context("Failed to write reply")?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed");
    Ok(())
}

async fn answer(server: &MageServer, line: &str) -> String {
    match serde_json::from_str::<Request>(line) {
        Ok(Request::Resource { resource }) => server.read_resource(&resource).await,
        Ok(Request::Tool { tool, arguments }) => server.call_tool(&tool, arguments).await,
        Err(e) => {
            tracing::warn!("Malformed request: {}", e);
            format!("Malformed request: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mage_mcp::Config;
    use serde_json::json;

    #[test]
    fn test_request_shapes() {
        let request: Request = serde_json::from_str(r#"{"resource": "mage://pipelines"}"#).unwrap();
        assert_eq!(
            request,
            Request::Resource {
                resource: "mage://pipelines".to_string()
            }
        );

        let request: Request = serde_json::from_str(
            r#"{"tool": "execute_pipeline", "arguments": {"pipeline_uuid": "etl"}}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::Tool {
                tool: "execute_pipeline".to_string(),
                arguments: json!({"pipeline_uuid": "etl"}),
            }
        );

        let request: Request = serde_json::from_str(r#"{"tool": "list_all_pipelines"}"#).unwrap();
        assert_eq!(
            request,
            Request::Tool {
                tool: "list_all_pipelines".to_string(),
                arguments: Value::Null,
            }
        );
    }

    #[tokio::test]
    async fn test_answer_routes_requests() {
        let addr = mage_mock::spawn().await.unwrap();
        let server = MageServer::start("test", &Config::new(mage_mock::api_url(addr))).unwrap();

        let text = answer(&server, r#"{"tool": "list_all_pipelines"}"#).await;
        assert!(text.starts_with("Available Pipelines in Mage.ai:"));

        let text = answer(&server, r#"{"resource": "pipelines/example_pipeline/blocks"}"#).await;
        let blocks: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(blocks.as_array().unwrap().len(), 3);

        let text = answer(&server, "not json").await;
        assert!(text.starts_with("Malformed request:"));

        server.shutdown();
    }
}
