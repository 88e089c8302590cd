use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use teller_client::ClientConfig;
use teller_feed::FeedConfig;
use teller_persist::StorageConfig;

pub const ENV_PREFIX: &str = "TELLER";
pub const TOKEN_VAR: &str = "TELLER_API_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ClientConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. TELLER_<SECTION>__<KEY> environment variables
    ///
    /// The bearer token is never read from files, only from TELLER_API_TOKEN.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.api.bearer_token = std::env::var(TOKEN_VAR)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg: Config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Message("api.base_url must not be empty".to_string()));
        }
        let feed = &self.feed;
        if feed.max_page_size == 0 || feed.initial_page_size == 0 {
            return Err(ConfigError::Message("feed page sizes must be positive".to_string()));
        }
        if feed.initial_page_size > feed.max_page_size {
            return Err(ConfigError::Message(format!(
                "feed.initial_page_size ({}) exceeds feed.max_page_size ({})",
                feed.initial_page_size, feed.max_page_size
            )));
        }
        Ok(())
    }
}
