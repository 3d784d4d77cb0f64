//! Steampipe query handlers
//!
//! Runs the query through the executor and normalizes whatever comes back.
//! Every outcome, including failures, is returned as text through the
//! success channel.

use mcp_common::{text_success, CallToolResult, McpResult};
use tracing::{error, info, warn};

use crate::normalize::normalize;
use crate::params::QueryParams;
use crate::steampipe::SteampipeExecutor;

/// Execute a query and produce the caller-facing response text
pub async fn run_query_text(
    executor: &SteampipeExecutor,
    stdout_preview_chars: usize,
    query: &str,
) -> String {
    info!(%query, "received steampipe query");

    let result = match executor.run_query(query).await {
        Ok(result) => result,
        Err(e) => {
            let text = e.to_tool_text();
            error!(error = %e, "steampipe query could not complete");
            return text;
        }
    };

    if !result.stdout.is_empty() {
        info!(
            stdout = %preview(&result.stdout, stdout_preview_chars),
            "steampipe stdout"
        );
    }
    if !result.stderr.is_empty() {
        warn!(stderr = %result.stderr, "steampipe stderr");
    }

    let text = normalize(&result);
    if text.starts_with("Error: ") {
        error!(exit_code = result.exit_code, response = %text, "steampipe query failed");
    } else {
        info!(exit_code = result.exit_code, "steampipe query succeeded");
    }
    text
}

pub async fn run_steampipe_query(
    executor: &SteampipeExecutor,
    stdout_preview_chars: usize,
    params: QueryParams,
) -> McpResult<CallToolResult> {
    let text = run_query_text(executor, stdout_preview_chars, &params.query).await;
    Ok(text_success(text))
}

/// First `max_chars` characters of `text`, with `...` appended if cut
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("[{\"x\":1}]", 500), "[{\"x\":1}]");
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("abc", 3), "abc");
    }
}
