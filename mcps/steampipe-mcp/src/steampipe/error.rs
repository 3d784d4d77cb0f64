//! Error types for steampipe CLI operations
//!
//! Every variant's `Display` is the message handed back to the calling
//! agent, prefixed with `Error: ` by [`SteampipeError::to_tool_text`].

use thiserror::Error;

/// Errors that can occur while running or interpreting a steampipe query
#[derive(Error, Debug)]
pub enum SteampipeError {
    /// steampipe exited with a non-zero exit code
    #[error("Steampipe query failed with exit code {code}.{}", error_details(.stderr))]
    CommandFailed {
        /// Exit code from the steampipe process (`-<signal>` if killed by a signal)
        code: i32,
        /// Standard error output from steampipe
        stderr: String,
    },

    /// Neither the whole output nor any single line was valid JSON
    #[error("Failed to parse steampipe JSON output.")]
    ParseFailed,

    /// Parsed output could not be written back out as JSON
    #[error("Failed to parse Steampipe output as JSON. Error: {source}. Raw output: {raw}")]
    Serialize {
        source: serde_json::Error,
        raw: String,
    },

    /// steampipe did not finish within the configured timeout
    #[error("Steampipe query timed out after {0} seconds.")]
    Timeout(u64),

    /// steampipe is not installed or not in PATH
    #[error("Steampipe command not found. Make sure it's installed and in your system PATH.")]
    NotFound,

    /// Any other failure launching or waiting on the process
    #[error("An unexpected error occurred while running Steampipe: {0}")]
    SystemFault(#[from] std::io::Error),
}

impl SteampipeError {
    /// Render the error as a tool result payload
    pub fn to_tool_text(&self) -> String {
        format!("Error: {}", self)
    }
}

fn error_details(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\nError details: {}", stderr)
    }
}

/// Result type alias for steampipe operations
pub type SteampipeResult<T> = Result<T, SteampipeError>;
