// Rust guideline compliant 2026-10-19

//! Configuration management for Threadswap.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// Human-readable table format.
    #[default]
    Table,
    /// Plain text format.
    Plain,
}

/// Configuration for Threadswap behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Page size for browse, favorites and personal listings.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest page size a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Page size for moderation queues and the ledger.
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: usize,

    /// Default output format for commands.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Log level: error, warn, info or debug.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    12
}

fn default_max_page_size() -> usize {
    50
}

fn default_admin_page_size() -> usize {
    20
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            admin_page_size: default_admin_page_size(),
            output_format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// File name of the configuration inside the data directory.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `.threadswap/config.toml`
    /// 3. Environment variables with `THREADSWAP_` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_path = data_dir.join(Self::FILE_NAME);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            config = toml::from_str(&content)
                .map_err(|e| Error::InvalidArgument(format!("Invalid config file: {}", e)))?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `THREADSWAP_DEFAULT_PAGE_SIZE`
    /// - `THREADSWAP_MAX_PAGE_SIZE`
    /// - `THREADSWAP_ADMIN_PAGE_SIZE`
    /// - `THREADSWAP_OUTPUT_FORMAT` - json/table/plain
    /// - `THREADSWAP_LOG_LEVEL` - error/warn/info/debug
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values are invalid.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_usize("THREADSWAP_DEFAULT_PAGE_SIZE")? {
            self.default_page_size = val;
        }

        if let Some(val) = env_usize("THREADSWAP_MAX_PAGE_SIZE")? {
            self.max_page_size = val;
        }

        if let Some(val) = env_usize("THREADSWAP_ADMIN_PAGE_SIZE")? {
            self.admin_page_size = val;
        }

        if let Ok(val) = std::env::var("THREADSWAP_OUTPUT_FORMAT") {
            self.output_format = match val.as_str() {
                "json" => OutputFormat::Json,
                "table" => OutputFormat::Table,
                "plain" => OutputFormat::Plain,
                _ => {
                    return Err(Error::InvalidArgument(
                        "THREADSWAP_OUTPUT_FORMAT must be json, table, or plain".to_string(),
                    ))
                }
            };
        }

        if let Ok(val) = std::env::var("THREADSWAP_LOG_LEVEL") {
            self.log_level = val.to_lowercase();
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A page size is zero
    /// - A default page size exceeds `max_page_size`
    /// - The log level is unknown
    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 || self.admin_page_size == 0 || self.max_page_size == 0 {
            return Err(Error::InvalidArgument(
                "Page sizes must be greater than 0".to_string(),
            ));
        }

        if self.default_page_size > self.max_page_size || self.admin_page_size > self.max_page_size
        {
            return Err(Error::InvalidArgument(format!(
                "Page sizes cannot exceed max_page_size ({})",
                self.max_page_size
            )));
        }

        if !matches!(
            self.log_level.as_str(),
            "error" | "warn" | "info" | "debug"
        ) {
            return Err(Error::InvalidArgument(format!(
                "log_level must be error, warn, info or debug, got {}",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Clamps a requested page size to `1..=max_page_size`.
    #[must_use]
    pub fn clamp_page_size(&self, requested: Option<usize>, fallback: usize) -> usize {
        requested.unwrap_or(fallback).clamp(1, self.max_page_size)
    }

    /// Saves the configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or written
    /// - Serialization fails
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let config_path = data_dir.join(Self::FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidArgument(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(val) => val
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidArgument(format!("{} must be a positive number", name))),
        Err(_) => Ok(None),
    }
}
