//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] with text or JSON output on stderr
//! - **Results**: helpers for building and reading `CallToolResult` values
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! # Embedding MCPs
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use steampipe_mcp::SteampipeMcpServer;
//!
//! let server = SteampipeMcpServer::new();
//! let result = server
//!     .call_tool("run_steampipe_query", serde_json::json!({ "query": "select 1" }))
//!     .await?;
//! ```

pub mod embeddable;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::{init_tracing, LogFormat};
pub use result::{result_text, text_success, McpResult};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
