//! Embeddable MCP trait for in-process execution
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without
//! spawning the server binary or speaking the stdio protocol.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use steampipe_mcp::SteampipeMcpServer;
//!
//! let server = SteampipeMcpServer::new();
//! let names: Vec<_> = server.list_tools().into_iter().map(|t| t.name).collect();
//! let result = server
//!     .call_tool("run_steampipe_query", serde_json::json!({ "query": "select 1" }))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Parameters did not match the tool's input schema
    #[error("invalid parameters: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// The tool returned an MCP protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Trait for MCP servers that can be executed in-process
///
/// Implementations must be `Send + Sync`; hosts may issue concurrent calls
/// from several tasks. Servers built on rmcp's `#[tool_router]` implement
/// `list_tools` by delegating to `ToolRouter::list_all`.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name, matching the name used in MCP configuration files
    fn server_name(&self) -> &str;

    /// All available tools with their names, descriptions and input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name
    ///
    /// `params` is the JSON object of tool arguments. Fails when the tool
    /// is unknown, the parameters don't deserialize, or the tool itself
    /// returns an MCP error.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Optional human-readable description of the server
    fn server_description(&self) -> Option<&str> {
        None
    }
}
