//! Configuration management for kwscope
//!
//! This module handles loading and validating configuration from environment variables,
//! TOML files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::batch::BatchConfig;
use crate::clustering::ClusteringOptions;
use crate::trend::TrendOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyword clustering options
    pub clustering: ClusteringOptions,

    /// Trend analysis options
    pub trend: TrendOptions,

    /// Batch execution configuration
    pub batch: BatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("pretty"),
        }
    }
}

/// Parse an environment variable, keeping `default` when unset
fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `KWSCOPE_*` environment variables on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        self.clustering.min_cluster_size =
            env_or("KWSCOPE_MIN_CLUSTER_SIZE", self.clustering.min_cluster_size)?;
        self.clustering.max_clusters = env_or("KWSCOPE_MAX_CLUSTERS", self.clustering.max_clusters)?;
        self.clustering.similarity_threshold = env_or(
            "KWSCOPE_SIMILARITY_THRESHOLD",
            self.clustering.similarity_threshold,
        )?;

        self.trend.smoothing_window = env_or("KWSCOPE_SMOOTHING_WINDOW", self.trend.smoothing_window)?;
        self.trend.seasonality_threshold = env_or(
            "KWSCOPE_SEASONALITY_THRESHOLD",
            self.trend.seasonality_threshold,
        )?;
        self.trend.volatility_window =
            env_or("KWSCOPE_VOLATILITY_WINDOW", self.trend.volatility_window)?;

        self.batch.max_concurrency = env_or("KWSCOPE_BATCH_CONCURRENCY", self.batch.max_concurrency)?;

        if let Ok(level) = std::env::var("KWSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("KWSCOPE_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.clustering
            .validate()
            .context("Invalid clustering configuration")?;
        self.trend.validate().context("Invalid trend configuration")?;

        if self.batch.max_concurrency == 0 {
            anyhow::bail!("max_concurrency must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "log format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = Config::default();
        config.batch.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = Config::default();
        config.clustering.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_serialization_error() {
        use crate::error::{Error, ErrorCategory, KwscopeErrorTrait};

        let err = Config::from_toml_str("[batch\nmax_concurrency = ").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [clustering]
            min_cluster_size = 2

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.clustering.min_cluster_size, 2);
        assert_eq!(config.clustering.max_clusters, 50);
        assert_eq!(config.trend, TrendOptions::default());
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }
}
