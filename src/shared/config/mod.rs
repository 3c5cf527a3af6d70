//! Application configuration module
//!
//! Provides the client-side configuration: where the chat server lives and
//! how often to poll it.

use std::time::Duration;
use thiserror::Error;

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server URL, without trailing slash
    pub server_url: String,
    /// Interval between two polls
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read `CHAT_SERVER_URL` and `CHAT_POLL_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("CHAT_SERVER_URL") {
            builder = builder.server_url(url);
        }
        if let Ok(ms) = std::env::var("CHAT_POLL_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CHAT_POLL_MS", ms.clone()))?;
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue("poll_interval", "0".to_string()));
        }
        Ok(())
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    poll_interval: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
