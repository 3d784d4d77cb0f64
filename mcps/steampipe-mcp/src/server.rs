//! MCP Server implementation
//!
//! Exposes Steampipe's SQL query capability as a single tool.
//! Handler implementations are in the handlers module.

use mcp_common::{
    async_trait, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::config::Config;
use crate::handlers;
use crate::params::*;
use crate::steampipe::SteampipeExecutor;

/// The Steampipe MCP Server
///
/// Holds only immutable settings; every call gets its own child process.
#[derive(Clone)]
pub struct SteampipeMcpServer {
    executor: SteampipeExecutor,
    stdout_preview_chars: usize,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl SteampipeMcpServer {
    /// Create a server with the default configuration
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            executor: SteampipeExecutor::from_config(&config.steampipe),
            stdout_preview_chars: config.logging.stdout_preview_chars,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server around an already-built executor
    pub fn with_executor(executor: SteampipeExecutor) -> Self {
        Self {
            executor,
            stdout_preview_chars: Config::default().logging.stdout_preview_chars,
            tool_router: Self::tool_router(),
        }
    }

    pub fn executor(&self) -> &SteampipeExecutor {
        &self.executor
    }

    #[tool(
        description = "Executes a SQL query using the Steampipe CLI and returns the results as a JSON string. \
                       Steampipe speaks PostgreSQL SQL over tables provided by its installed plugins \
                       (e.g. aws_s3_bucket, github_user). Examples: \
                       \"select login from github_user limit 1\", \
                       \"select name, region from aws_s3_bucket where region = 'us-east-1'\". \
                       Rows come back as a JSON array of objects; failures come back as text starting with \"Error: \"."
    )]
    async fn run_steampipe_query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::run_steampipe_query(&self.executor, self.stdout_preview_chars, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for SteampipeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Steampipe MCP server. Run SQL (PostgreSQL dialect) against Steampipe plugin \
                 tables with run_steampipe_query; results are returned as pretty-printed JSON."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for SteampipeMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Embeddable Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for SteampipeMcpServer {
    fn server_name(&self) -> &str {
        "steampipe"
    }

    fn server_description(&self) -> Option<&str> {
        Some("Runs SQL queries through the Steampipe CLI and returns JSON rows.")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "run_steampipe_query" => {
                let params: QueryParams = serde_json::from_value(params)?;
                self.run_steampipe_query(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_embeddable_server_name() {
        let server = SteampipeMcpServer::new();
        assert_eq!(server.server_name(), "steampipe");
        assert!(server.server_description().is_some());
    }

    #[test]
    fn test_single_tool_registered() {
        let server = SteampipeMcpServer::new();
        let tools = server.list_tools();

        assert_eq!(tools.len(), 1);
        let tool = &tools[0];
        assert_eq!(tool.name.as_ref(), "run_steampipe_query");

        let description = tool.description.as_deref().unwrap_or_default();
        assert!(description.contains("PostgreSQL"));
        assert!(description.contains("select login from github_user limit 1"));

        let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();
        assert!(schema["properties"]["query"].is_object());
        assert_eq!(schema["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_with_config_applies_settings() {
        let mut config = Config::default();
        config.steampipe.command = "/opt/sp".to_string();
        config.steampipe.timeout_secs = 5;

        let server = SteampipeMcpServer::with_config(&config);

        assert_eq!(server.executor().command(), "/opt/sp");
        assert_eq!(server.executor().timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_embeddable_unknown_tool() {
        let server = SteampipeMcpServer::new();
        let result = server
            .call_tool("nonexistent_tool", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_embeddable_missing_query_param() {
        let server = SteampipeMcpServer::new();
        let result = server
            .call_tool("run_steampipe_query", serde_json::json!({ "sql": "select 1" }))
            .await;

        assert!(matches!(result, Err(EmbeddableError::SerdeError(_))));
    }
}
