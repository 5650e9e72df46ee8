//! Configuration management for fexplorer.
//!
//! This module provides TOML-based configuration loading. The default
//! configuration path is `~/.config/fexplorer/config.toml`; it is read if it
//! exists and never written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::explorer::ExplorerOptions;
use crate::files::{ExistingFilePolicy, DEFAULT_COPY_BUFFER_SIZE};

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("copy_buffer_size must be greater than 0, got {0}")]
    InvalidCopyBufferSize(usize),

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),

    #[error("start_dir is not a directory: {0}")]
    InvalidStartDir(PathBuf),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub explorer: GeneralConfig,

    /// Listing settings.
    pub listing: ListingConfig,

    /// File operation settings.
    pub files: FilesConfig,

    /// Display settings.
    pub display: DisplayConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory to start in instead of the working directory.
    pub start_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Listing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingConfig {
    /// Include entries whose name starts with '.'.
    pub show_hidden: bool,
}

/// File operation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Buffer size in bytes for file copies.
    pub copy_buffer_size: usize,

    /// Copy into a temp file and rename it into place.
    pub atomic_copy: bool,

    /// What "create file" does when the file exists.
    pub existing_file: ExistingFilePolicy,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use terminal colors.
    pub color: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_dir: None,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            atomic_copy: false,
            existing_file: ExistingFilePolicy::Keep,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fexplorer")
        .join("config.toml")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - FEXPLORER_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    /// - FEXPLORER_START_DIR: Override the start directory
    ///
    /// Runs before logging is installed, so it returns the names of the
    /// variables that were applied for the caller to log.
    pub fn apply_env_overrides(&mut self) -> Vec<&'static str> {
        let mut applied = Vec::new();

        if let Ok(level) = std::env::var("FEXPLORER_LOG_LEVEL") {
            if !level.is_empty() {
                self.explorer.log_level = level;
                applied.push("FEXPLORER_LOG_LEVEL");
            }
        }

        if let Ok(dir) = std::env::var("FEXPLORER_START_DIR") {
            if !dir.is_empty() {
                self.explorer.start_dir = Some(PathBuf::from(dir));
                applied.push("FEXPLORER_START_DIR");
            }
        }

        applied
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.copy_buffer_size == 0 {
            return Err(ConfigError::InvalidCopyBufferSize(self.files.copy_buffer_size));
        }

        let level = self.explorer.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.explorer.log_level.clone()));
        }

        if let Some(dir) = &self.explorer.start_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidStartDir(dir.clone()));
            }
        }

        Ok(())
    }

    /// Scanner and file operation settings for the [`Explorer`](crate::Explorer).
    pub fn explorer_options(&self) -> ExplorerOptions {
        ExplorerOptions {
            show_hidden: self.listing.show_hidden,
            copy_buffer_size: self.files.copy_buffer_size,
            atomic_copy: self.files.atomic_copy,
            existing_file: self.files.existing_file,
        }
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
