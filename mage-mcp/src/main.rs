//! Mage MCP binary
//!
//! Starts a session against the Mage API, runs one command and ends the
//! session. Logs go to stderr; stdout carries only command output.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use mage_mcp::server::DEFAULT_NAME;
use mage_mcp::{Config, MageServer};

#[derive(Parser)]
#[command(name = "mage-mcp")]
#[command(about = "Mage.ai resources and tools for assistants", long_about = None)]
struct Cli {
    /// Mage API base URL [env: MAGE_API_URL, default: http://localhost:6789/api/]
    #[arg(long)]
    api_url: Option<String>,

    /// Mage API key, sent as X-API-KEY [env: MAGE_API_KEY]
    #[arg(long)]
    api_key: Option<String>,

    /// Request timeout in seconds [env: MAGE_API_TIMEOUT, default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Server name reported in logs
    #[arg(long, default_value = DEFAULT_NAME)]
    name: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "mage_mcp=debug,mage_client=debug"
    } else {
        "mage_mcp=info"
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()
        .context("Invalid MAGE_API_* environment")?
        .apply_overrides(cli.api_url, cli.api_key, cli.timeout);

    let server = MageServer::start(cli.name, &config).context("Failed to start session")?;

    let result = handle_command(cli.command, &server).await;
    server.shutdown();
    result
}
