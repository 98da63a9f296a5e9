use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid model provider: {0}. Must be one of: anthropic, mock")]
    InvalidProvider(String),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid temperature: {0}. Must be within [0, 1]")]
    InvalidTemperature(f32),

    #[error("Invalid rate limit: {0}. Must be at least 1 request per second")]
    InvalidRateLimit(u32),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid max_concurrent_scoring: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Invalid risk_threshold: {0}. Must be within [0, 1]")]
    InvalidRiskThreshold(f64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// The layered figment, lowest to highest precedence:
    /// 1. Programmatic defaults (Serialized)
    /// 2. .beliefscope/config.yaml (project config)
    /// 3. .beliefscope/local.yaml (local overrides, optional)
    /// 4. `extra`, an explicitly named file (optional)
    /// 5. Environment variables (BELIEFSCOPE_* prefix, `__` nests)
    pub fn figment(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".beliefscope/config.yaml"))
            .merge(Yaml::file(".beliefscope/local.yaml"));

        if let Some(path) = extra {
            figment = figment.merge(Yaml::file(path));
        }

        figment.merge(Env::prefixed("BELIEFSCOPE_").split("__"))
    }

    /// Load configuration from the project files and environment.
    pub fn load() -> Result<Config> {
        Self::load_with(None)
    }

    /// Load configuration, layering `extra` above the project files.
    pub fn load_with(extra: Option<&Path>) -> Result<Config> {
        if let Some(path) = extra {
            if !path.exists() {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
        }

        let config: Config = Self::figment(extra)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file only (no project files, no
    /// environment).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let valid_providers = ["anthropic", "mock"];
        if !valid_providers.contains(&config.model.provider.as_str()) {
            return Err(ConfigError::InvalidProvider(config.model.provider.clone()));
        }

        if config.model.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model.base_url cannot be empty".to_string(),
            ));
        }

        if config.model.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.model.max_tokens));
        }

        if let Some(temperature) = config.model.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(ConfigError::InvalidTemperature(temperature));
            }
        }

        if config.model.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "model.timeout_secs must be at least 1".to_string(),
            ));
        }

        if config.rate_limit.requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(config.rate_limit.requests_per_second));
        }

        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.comparison.max_concurrent_scoring == 0 {
            return Err(ConfigError::InvalidConcurrency(
                config.comparison.max_concurrent_scoring,
            ));
        }

        if let Some(threshold) = config.comparison.risk_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::InvalidRiskThreshold(threshold));
            }
        }

        Ok(())
    }
}
