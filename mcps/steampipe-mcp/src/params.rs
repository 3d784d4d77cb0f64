//! Parameter types for Steampipe MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryParams {
    #[schemars(
        description = "The SQL query to execute via Steampipe (PostgreSQL syntax over Steampipe plugin tables), e.g. \"select login from github_user limit 1\""
    )]
    pub query: String,
}
