use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use eventline_client::StreamConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub stream: StreamTuning,
    pub subscription: SubscriptionConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only)
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamTuning {
    pub batch_flush_timeout_secs: u64,
    pub batch_limit: u32,
    pub commit_timeout_secs: u64,
    pub retry_margin_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Existing subscription to consume. When unset, one is created from
    /// `event_types` and `consumer_group` at startup.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub consumer_group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with API_, STREAM_, etc. prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("API")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("STREAM")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("SUBSCRIPTION")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // API key never lives in TOML
        cfg.api_key = std::env::var("EVENTLINE_API_KEY").map_err(|_| {
            ConfigError::Message("EVENTLINE_API_KEY environment variable is required".to_string())
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Client-facing view of the stream tuning.
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig::new(&self.api.base_url)
            .with_batch_flush_timeout(Duration::from_secs(self.stream.batch_flush_timeout_secs))
            .with_batch_limit(self.stream.batch_limit)
            .with_commit_timeout(Duration::from_secs(self.stream.commit_timeout_secs))
            .with_retry_margin(Duration::from_secs(self.stream.retry_margin_secs))
    }
}
