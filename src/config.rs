//! Configuration handling for mcol
//!
//! Configuration is stored in `~/.config/mcol/config.toml` (or the platform
//! equivalent). Set `MCOL_CONFIG` to read a different file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "MCOL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--format` is not given
    pub default_format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            pretty: true,
        }
    }
}

impl Config {
    /// Loads configuration from `MCOL_CONFIG` or the default location
    ///
    /// A missing default file yields defaults; a missing `MCOL_CONFIG` file
    /// is an error.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()))
                    .with_context(|| format!("{} points to a missing file", CONFIG_ENV));
            }
            return Self::load_from(&path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "moncli", "mcol").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }
}
