//! Client configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file named by `RAGDESK_CONFIG` (a `[client]` table)
//! - environment variables (`RAGDESK_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use ragdesk_client::config::ClientConfig;
//!
//! // File if RAGDESK_CONFIG is set, otherwise env vars
//! let config = ClientConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = ClientConfig::from_file(std::path::Path::new("ragdesk.toml")).expect("Failed to load");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use ragdesk_core::defaults;

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "RAGDESK_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for ragdesk_core::Error {
    fn from(e: ConfigError) -> Self {
        ragdesk_core::Error::Config(e.to_string())
    }
}

/// Connection and timing settings for [`crate::RagClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the RAG backend API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// How long a cached read stays fresh.
    pub cache_ttl_ms: u64,
    /// Interval between ingestion status checks.
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
            cache_ttl_ms: defaults::CACHE_TTL_MS,
            poll_interval_ms: defaults::INGEST_POLL_INTERVAL_MS,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl ClientConfig {
    /// Create config pointing at `base_url` with default timings.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RAGDESK_API_BASE_URL` | `http://localhost:8000` | API base URL |
    /// | `RAGDESK_TIMEOUT_SECS` | `30` | Request timeout |
    /// | `RAGDESK_CACHE_TTL_MS` | `30000` | Cache freshness window |
    /// | `RAGDESK_POLL_INTERVAL_MS` | `2000` | Ingestion status interval |
    pub fn from_env() -> Self {
        let base_url = match env::var(defaults::API_BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                warn!(
                    default = defaults::API_BASE_URL,
                    "{} not set, using default",
                    defaults::API_BASE_URL_ENV
                );
                defaults::API_BASE_URL.to_string()
            }
        };

        Self {
            base_url,
            timeout_seconds: env_u64("RAGDESK_TIMEOUT_SECS", defaults::REQUEST_TIMEOUT_SECS),
            cache_ttl_ms: env_u64("RAGDESK_CACHE_TTL_MS", defaults::CACHE_TTL_MS),
            poll_interval_ms: env_u64("RAGDESK_POLL_INTERVAL_MS", defaults::INGEST_POLL_INTERVAL_MS),
        }
    }

    /// Load from the file named by `RAGDESK_CONFIG`, falling back to env vars.
    pub fn load() -> ConfigResult<Self> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                info!("Loading client config from: {}", path);
                Self::from_file(Path::new(&path))
            }
            _ => {
                debug!("{} not set, using environment variables", CONFIG_PATH_ENV);
                let config = Self::from_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// `${VAR}` placeholders are replaced from the environment before parsing.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let content = Self::substitute_env_vars(&content);

        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            client: ClientConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        root.client.validate()?;
        Ok(root.client)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout_seconds must be > 0".to_string(),
            ));
        }

        if self.cache_ttl_ms == 0 {
            return Err(ConfigError::Validation(
                "cache_ttl_ms must be > 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn substitute_env_vars(content: &str) -> String {
        let re = match regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return content.to_string(),
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}
