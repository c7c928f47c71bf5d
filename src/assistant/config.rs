//! Assistant endpoint configuration

use std::time::Duration;
use thiserror::Error;

/// Production assistant service
pub const DEFAULT_BASE_URL: &str = "https://uwvchatbot-f850ea49bdeb.herokuapp.com";

const ENV_BASE_URL: &str = "ASSISTANT_API_URL";
const ENV_TIMEOUT_SECS: &str = "ASSISTANT_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("assistant base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Where and how to reach the assistant service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub base_url: String,
    /// Client-side cap per request. `None` lets a slow call stay pending.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AssistantConfig {
    /// Defaults overridden by `ASSISTANT_API_URL` and `ASSISTANT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when either variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the url is http or https.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }
}
