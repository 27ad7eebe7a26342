use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid cache capacity for {field}: {value}. Must be at least 1")]
    InvalidCacheCapacity { field: &'static str, value: usize },

    #[error("Invalid scan page_size: {0}. Must be at least 1")]
    InvalidScanPageSize(i64),

    #[error("Invalid scan max_pages: {0}. Must be at least 1")]
    InvalidScanMaxPages(u32),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .qualidoc/config.yaml (project config)
    /// 3. .qualidoc/local.yaml (local overrides, optional)
    /// 4. Environment variables (QUALIDOC_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".qualidoc/config.yaml"))
            .merge(Yaml::file(".qualidoc/local.yaml"))
            .merge(Env::prefixed("QUALIDOC_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        for (field, value) in [
            ("aggregate_capacity", config.cache.aggregate_capacity),
            ("children_capacity", config.cache.children_capacity),
            ("reference_capacity", config.cache.reference_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidCacheCapacity { field, value });
            }
        }

        if config.scan.page_size < 1 {
            return Err(ConfigError::InvalidScanPageSize(config.scan.page_size));
        }

        if config.scan.max_pages == 0 {
            return Err(ConfigError::InvalidScanMaxPages(config.scan.max_pages));
        }

        Ok(())
    }
}
