//! Project configuration file support for veredicto.
//!
//! Loads configuration from `veredicto.toml` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Project-level configuration loaded from `veredicto.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,
    /// Base URL of the OpenAI-compatible API
    pub api_base: Option<String>,
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the HTTP API server
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: Option<u16>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "veredicto.toml";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the effective model identifier.
    /// Priority: CLI flag > config file > built-in default
    pub fn effective_model(&self, flag: Option<&str>) -> String {
        flag.or(self.model.as_deref())
            .unwrap_or(veredicto_model::DEFAULT_MODEL)
            .to_string()
    }

    /// Get the effective API base URL, if any was configured.
    /// Priority: CLI flag > environment > config file
    pub fn effective_api_base(&self, flag: Option<&str>, env: Option<&str>) -> Option<String> {
        flag.or(env).or(self.api_base.as_deref()).map(str::to_string)
    }

    /// Get the effective server port.
    /// Priority: CLI flag > config file > default
    pub fn effective_port(&self, flag: Option<u16>, default: u16) -> u16 {
        flag.or(self.server.port).unwrap_or(default)
    }
}
