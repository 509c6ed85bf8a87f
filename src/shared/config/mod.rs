//! Application configuration module
//!
//! Client-side settings: where the board API lives, how long a request may
//! take, and whether a successful reorder is followed by a reconciling
//! re-fetch.

use std::time::Duration;

use thiserror::Error;

/// Default server URL, the port the original server listens on
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the board API, without trailing slash
    pub server_url: String,
    /// Re-fetch the aggregate after a successful reorder batch
    pub refetch_on_success: bool,
    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            refetch_on_success: true,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Full URL for an API path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    refetch_on_success: Option<bool>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn refetch_on_success(mut self, enabled: bool) -> Self {
        self.refetch_on_success = Some(enabled);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let server_url = self
            .server_url
            .ok_or(ConfigError::MissingValue("server_url"))?
            .trim_end_matches('/')
            .to_string();
        let config = AppConfig {
            server_url,
            refetch_on_success: self
                .refetch_on_success
                .unwrap_or(defaults.refetch_on_success),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
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
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
