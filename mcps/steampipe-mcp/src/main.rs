//! Steampipe MCP Server
//!
//! Wraps the Steampipe CLI (`steampipe query ... --output json`) as an MCP
//! tool served over stdio.
//!
//! # Usage
//!
//! ```bash
//! steampipe-mcp                          # serve over stdio
//! steampipe-mcp --config ./sp.toml       # explicit config file
//! steampipe-mcp --check                  # probe steampipe and exit
//! ```
//!
//! Or configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "steampipe": {
//!       "command": "./target/release/steampipe-mcp"
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mcp_common::LogFormat;
use rmcp::{transport::stdio, ServiceExt};

use steampipe_mcp::config::Config;
use steampipe_mcp::SteampipeMcpServer;

#[derive(Debug, Parser)]
#[command(name = "steampipe-mcp", version, about = "MCP server for Steampipe SQL queries")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "STEAMPIPE_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Check that steampipe can be launched, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref())?;
    let format = LogFormat::from_env().unwrap_or(loaded.config.logging.format);
    mcp_common::init_tracing("steampipe_mcp", format)?;

    match &loaded.source {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("Using default configuration"),
    }
    for reason in &loaded.skipped {
        tracing::warn!("Skipped config file: {}", reason);
    }

    let server = SteampipeMcpServer::with_config(&loaded.config);

    // Startup probe; per-call errors still reach the caller if this fails
    let probe = server.executor().check_available().await;
    if cli.check {
        return Ok(match probe {
            Ok(version) => {
                println!("{}", version);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        });
    }
    match probe {
        Ok(version) => tracing::info!(%version, "steampipe available"),
        Err(e) => tracing::warn!("steampipe check failed: {}", e),
    }

    tracing::info!("Starting steampipe_mcp MCP Server");

    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(ExitCode::SUCCESS)
}
