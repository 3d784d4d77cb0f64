//! Output normalization
//!
//! Turns captured steampipe output into the string returned to the caller.
//! Depending on version and query shape, `--output json` emits either one
//! JSON document or newline-delimited JSON; both are accepted without
//! knowing in advance which one was produced.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::steampipe::{ExecutionResult, SteampipeError, SteampipeResult};

/// Outcome of the two-stage JSON parse
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    /// The whole output was a single JSON document
    Whole(Value),
    /// Values from the lines that parsed on their own, in order
    Lines(Vec<Value>),
    /// Nothing parsed
    Failed,
}

/// Parse output as one JSON document, falling back to one value per line
///
/// In the fallback, lines that fail to parse are logged and dropped.
pub fn parse_output(stdout: &str) -> ParsedOutput {
    let trimmed = stdout.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return ParsedOutput::Whole(value),
        Err(e) => warn!(
            error = %e,
            "failed to parse output as a single JSON document, trying line by line"
        ),
    }

    let mut values = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => values.push(value),
            Err(e) => warn!(line_number = idx + 1, %line, error = %e, "dropping unparsable line"),
        }
    }

    if values.is_empty() {
        ParsedOutput::Failed
    } else {
        ParsedOutput::Lines(values)
    }
}

/// Normalize a finished execution into the tool's response text
///
/// Never fails: problems come back as an `Error: ...` string.
pub fn normalize(result: &ExecutionResult) -> String {
    render(result).unwrap_or_else(|e| e.to_tool_text())
}

/// Normalize a finished execution, keeping failures typed
pub fn render(result: &ExecutionResult) -> SteampipeResult<String> {
    if !result.success() {
        return Err(SteampipeError::CommandFailed {
            code: result.exit_code,
            stderr: result.stderr.clone(),
        });
    }

    if result.stdout.trim().is_empty() {
        info!("steampipe returned no output");
        return Ok("[]".to_string());
    }

    match parse_output(&result.stdout) {
        ParsedOutput::Whole(value) => {
            debug!("parsed output as a single JSON document");
            to_pretty(&value, &result.stdout)
        }
        ParsedOutput::Lines(values) => {
            info!(rows = values.len(), "parsed output line by line");
            to_pretty(&values, &result.stdout)
        }
        ParsedOutput::Failed => Err(SteampipeError::ParseFailed),
    }
}

fn to_pretty<T: Serialize>(value: &T, raw: &str) -> SteampipeResult<String> {
    serde_json::to_string_pretty(value).map_err(|source| SteampipeError::Serialize {
        source,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(stdout: &str) -> ExecutionResult {
        ExecutionResult {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_single_row_scenario() {
        let out = normalize(&ok("[{\"x\":1}]"));
        assert_eq!(out, "[\n  {\n    \"x\": 1\n  }\n]");
    }

    #[test]
    fn test_whole_document_structurally_equal() {
        let raw = r#"[{"name":"a","tags":{"env":"prod"},"size":1.5},{"name":"b","tags":null,"size":2}]"#;
        let out = normalize(&ok(raw));

        let reparsed: Value = serde_json::from_str(&out).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(reparsed, original);
        assert!(out.contains("\n  {\n    \"name\": \"a\""));
    }

    #[test]
    fn test_key_order_preserved() {
        let out = normalize(&ok(r#"[{"zeta":1,"alpha":2,"mid":3}]"#));
        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        let mid = out.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_large_integers_survive_unchanged() {
        let out = normalize(&ok(
            r#"[{"n":123456789012345678901234567890,"neg":-98765432109876543210}]"#,
        ));
        assert_eq!(
            out,
            "[\n  {\n    \"n\": 123456789012345678901234567890,\n    \"neg\": -98765432109876543210\n  }\n]"
        );
    }

    #[test]
    fn test_large_integers_survive_line_fallback() {
        let out = normalize(&ok("{\"n\":18446744073709551616}\nnoise\n"));
        assert_eq!(out, "[\n  {\n    \"n\": 18446744073709551616\n  }\n]");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let out = normalize(&ok("\n\n  [{\"x\":1}]  \n"));
        assert_eq!(out, "[\n  {\n    \"x\": 1\n  }\n]");
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        assert_eq!(normalize(&ok("")), "[]");
        assert_eq!(normalize(&ok("  \n\t\n")), "[]");
    }

    #[test]
    fn test_nonzero_exit_reports_code() {
        let result = ExecutionResult {
            exit_code: 42,
            stdout: "[{\"x\":1}]".to_string(),
            stderr: String::new(),
        };
        let out = normalize(&result);
        assert!(out.starts_with("Error: "));
        assert!(out.contains("42"));
        assert!(!out.contains("Error details"));
    }

    #[test]
    fn test_nonzero_exit_includes_stderr() {
        let result = ExecutionResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: "Error: relation \"aws_nope\" does not exist".to_string(),
        };
        assert_eq!(
            normalize(&result),
            "Error: Steampipe query failed with exit code 1.\nError details: Error: relation \"aws_nope\" does not exist"
        );
    }

    #[test]
    fn test_ndjson_rows_in_order() {
        let raw = "{\"id\":1}\n{\"id\":2}\n{\"id\":3}\n";
        let out = normalize(&ok(raw));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    }

    #[test]
    fn test_partial_lines_keep_valid_ones() {
        let raw = "{\"id\":1}\nnot json at all\n{\"id\":2}\n{\"id\":\n{\"id\":3}";
        let out = normalize(&ok(raw));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert!(out.starts_with("[\n  {\n    \"id\": 1\n  }"));
    }

    #[test]
    fn test_all_lines_invalid() {
        let out = normalize(&ok("Warning: plugin not installed\nsomething else\n"));
        assert_eq!(out, "Error: Failed to parse steampipe JSON output.");
    }

    #[test]
    fn test_parse_output_whole() {
        assert_eq!(
            parse_output("[{\"a\":1}]"),
            ParsedOutput::Whole(json!([{"a": 1}]))
        );
        assert_eq!(parse_output("{\"a\":1}"), ParsedOutput::Whole(json!({"a": 1})));
    }

    #[test]
    fn test_parse_output_lines_skip_blank() {
        assert_eq!(
            parse_output("{\"a\":1}\n\n   \n{\"a\":2}"),
            ParsedOutput::Lines(vec![json!({"a": 1}), json!({"a": 2})])
        );
    }

    #[test]
    fn test_parse_output_multiple_documents_split_by_line() {
        assert_eq!(
            parse_output("[1,2]\n[3]"),
            ParsedOutput::Lines(vec![json!([1, 2]), json!([3])])
        );
    }

    #[test]
    fn test_parse_output_failed() {
        assert_eq!(parse_output("nope\n{broken"), ParsedOutput::Failed);
        assert_eq!(parse_output(""), ParsedOutput::Failed);
    }

    #[test]
    fn test_render_keeps_error_typed() {
        assert!(matches!(
            render(&ok("garbage")),
            Err(SteampipeError::ParseFailed)
        ));
        assert!(matches!(
            render(&ExecutionResult {
                exit_code: 2,
                stdout: String::new(),
                stderr: "boom".to_string(),
            }),
            Err(SteampipeError::CommandFailed { code: 2, .. })
        ));
    }
}
