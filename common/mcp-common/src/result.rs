//! Result helpers for MCP tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Create a successful plain text response
///
/// Tools whose callers only understand text (including error reports that
/// must travel through the success channel) return through this.
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Extract the concatenated text content of a tool result
///
/// Non-text content items are skipped.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            rmcp::model::RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
