//! Configuration for Steampipe MCP Server
//!
//! Every setting has a default, so the server runs without any config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mcp_common::LogFormat;
use serde::{Deserialize, Serialize};

/// Steampipe MCP configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub steampipe: SteampipeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How to invoke the steampipe executable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteampipeConfig {
    /// Executable name (resolved via PATH) or absolute path
    #[serde(default = "default_command")]
    pub command: String,

    /// Hard wall-clock limit per query, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_command() -> String {
    "steampipe".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for SteampipeConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log output format (overridden by `LOG_FORMAT`)
    #[serde(default)]
    pub format: LogFormat,

    /// How many characters of steampipe stdout to include in logs
    #[serde(default = "default_preview_chars")]
    pub stdout_preview_chars: usize,
}

fn default_preview_chars() -> usize {
    500
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            stdout_preview_chars: default_preview_chars(),
        }
    }
}

/// A loaded config plus what happened while finding it
///
/// Loading runs before tracing is initialized, so notes are carried back
/// for the caller to log once it is.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from, `None` for built-in defaults
    pub source: Option<PathBuf>,
    /// Discovered files that were skipped, with the reason
    pub skipped: Vec<String>,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path (from `--config` or `STEAMPIPE_MCP_CONFIG`) must
    /// exist and parse. Otherwise the first readable, valid file among
    /// these is used:
    /// 1. `$XDG_CONFIG_HOME/steampipe-mcp/config.toml`
    /// 2. `./steampipe-mcp.toml`
    ///
    /// and defaults apply if none is found.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            return Ok(LoadedConfig {
                config,
                source: Some(path.to_path_buf()),
                skipped: Vec::new(),
            });
        }

        let mut loaded = LoadedConfig::default();
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    loaded.config = config;
                    loaded.source = Some(path);
                    return Ok(loaded);
                }
                Err(e) => loaded.skipped.push(format!("{:#}", e)),
            }
        }

        Ok(loaded)
    }

    /// Read and parse a single TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("steampipe-mcp").join("config.toml"));
        }

        paths.push(PathBuf::from("steampipe-mcp.toml"));

        paths
    }
}
