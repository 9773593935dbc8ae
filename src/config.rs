//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default, so a missing section falls back to the provider's
//! free-tier limits. The API key is referenced by env-var name and resolved
//! at runtime.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::provider::backoff::ExponentialBackoff;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key_env: String,
    /// Minimum spacing between any two outbound calls.
    pub min_interval_ms: u64,
    pub max_retries: u32,
    /// Base delay after a throttling response, doubled per attempt.
    pub rate_limit_backoff_ms: u64,
    pub network_backoff_ms: u64,
    pub max_jitter_ms: u64,
    pub request_timeout_secs: u64,
    /// Route every sport to this host instead of the api-sports ones.
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "API_SPORTS_KEY".into(),
            min_interval_ms: 6_000,
            max_retries: 3,
            rate_limit_backoff_ms: 6_000,
            network_backoff_ms: 2_000,
            max_jitter_ms: 2_000,
            request_timeout_secs: 15,
            base_url: None,
        }
    }
}

impl ProviderConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            rate_limit_base: Duration::from_millis(self.rate_limit_backoff_ms),
            network_base: Duration::from_millis(self.network_backoff_ms),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<SecretString> {
        AppConfig::resolve_env(&self.api_key_env).map(SecretString::new)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BatchConfig {
    /// Fixtures aggregated concurrently per group.
    pub group_size: usize,
    pub group_pause_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: 1,
            group_pause_ms: 1_500,
        }
    }
}

impl BatchConfig {
    pub fn group_pause(&self) -> Duration {
        Duration::from_millis(self.group_pause_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
