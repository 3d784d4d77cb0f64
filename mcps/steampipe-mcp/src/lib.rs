//! Steampipe MCP Library
//!
//! MCP-compatible access to the Steampipe CLI: a single
//! `run_steampipe_query` tool that runs SQL through
//! `steampipe query <sql> --output json` and returns normalized JSON.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use steampipe_mcp::SteampipeMcpServer;
//!
//! let server = SteampipeMcpServer::new();
//! let result = server
//!     .call_tool("run_steampipe_query", serde_json::json!({ "query": "select 1 as x" }))
//!     .await?;
//! ```
//!
//! # Requirements
//! - `steampipe` installed and in PATH (or configured via `[steampipe] command`)

pub mod config;
pub mod handlers;
pub mod normalize;
pub mod params;
pub mod server;
pub mod steampipe;

// Re-export main server type
pub use server::SteampipeMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;
