#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for banker
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/banker/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)
//!
//! Pool manifests and scenarios are separate documents, see [`manifest`].

pub mod manifest;

pub use manifest::{PoolManifest, Scenario, Step};

use banker_errors::{ConfigError, Error};
use banker_types::ResourceVector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub growth: GrowthConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub json_logs: bool,
}

/// Invariant monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_monitor_enabled")]
    pub enabled: bool,
    #[serde(default = "default_monitor_interval_ms")]
    pub interval_ms: u64,
}

/// Background pool growth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_growth_interval_ms")]
    pub interval_ms: u64,
    /// Units added per kind on every tick
    #[serde(default)]
    pub increment: ResourceVector,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 500,
        }
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 5000,
            increment: ResourceVector::default(),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl GrowthConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Only a missing file counts as not found; other read failures keep
/// their cause.
pub(crate) fn read_error(path: &Path, err: &std::io::Error) -> ConfigError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ConfigError::NotFound {
            path: path.display().to_string(),
        }
    } else {
        ConfigError::Invalid {
            message: format!("failed to read {}: {err}", path.display()),
        }
    }
}

// Default value functions for serde
fn default_monitor_enabled() -> bool {
    true
}

fn default_monitor_interval_ms() -> u64 {
    500
}

fn default_growth_interval_ms() -> u64 {
    5000
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("banker").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML,
    /// or sets a zero polling interval.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| read_error(path, &e))?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(value) = std::env::var("BANKER_MONITOR_INTERVAL_MS") {
            self.monitor.interval_ms = parse_env("BANKER_MONITOR_INTERVAL_MS", value)?;
        }

        if let Ok(value) = std::env::var("BANKER_MONITOR_ENABLED") {
            self.monitor.enabled = parse_bool("BANKER_MONITOR_ENABLED", value)?;
        }

        if let Ok(value) = std::env::var("BANKER_GROWTH_INTERVAL_MS") {
            self.growth.interval_ms = parse_env("BANKER_GROWTH_INTERVAL_MS", value)?;
        }

        if let Ok(value) = std::env::var("BANKER_GROWTH_ENABLED") {
            self.growth.enabled = parse_bool("BANKER_GROWTH_ENABLED", value)?;
        }

        if let Ok(value) = std::env::var("BANKER_JSON_LOGS") {
            self.general.json_logs = parse_bool("BANKER_JSON_LOGS", value)?;
        }

        self.validate()
    }

    /// Reject settings no task could run with
    ///
    /// # Errors
    ///
    /// Returns an error if a polling interval is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.monitor.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.interval_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.growth.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "growth.interval_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: String) -> Result<T, Error> {
    value.parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()
    })
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}
