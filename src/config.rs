//! Breach checker configuration.
//!
//! Values come from environment variables, each falling back to a default:
//!
//! - `PWD_GUARD_HIBP_BASE_URL` (default `https://api.pwnedpasswords.com`)
//! - `PWD_GUARD_HIBP_API_KEY` (unset)
//! - `PWD_GUARD_USER_AGENT` (default `pwd-guard/<version>`)
//! - `PWD_GUARD_HIBP_TIMEOUT_MS` (default `5000`)
//! - `PWD_GUARD_BATCH_DELAY_MS` (default `100`)

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

const ENV_BASE_URL: &str = "PWD_GUARD_HIBP_BASE_URL";
const ENV_API_KEY: &str = "PWD_GUARD_HIBP_API_KEY";
const ENV_USER_AGENT: &str = "PWD_GUARD_USER_AGENT";
const ENV_TIMEOUT_MS: &str = "PWD_GUARD_HIBP_TIMEOUT_MS";
const ENV_BATCH_DELAY_MS: &str = "PWD_GUARD_BATCH_DELAY_MS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings for talking to the breach range service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between successive prefix requests in a batch.
    pub batch_delay: Duration,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn env_string(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_millis(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env_string(var) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

impl BreachConfig {
    /// Builds a configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a millisecond variable is set
    /// but not a non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            base_url: env_string(ENV_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: env_string(ENV_API_KEY),
            user_agent: env_string(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            timeout: env_millis(ENV_TIMEOUT_MS)?.unwrap_or(defaults.timeout),
            batch_delay: env_millis(ENV_BATCH_DELAY_MS)?.unwrap_or(defaults.batch_delay),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            base_url = %config.base_url,
            api_key = config.api_key.is_some(),
            timeout_ms = config.timeout.as_millis() as u64,
            "breach config loaded"
        );

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    /// URL of the range endpoint for a hash prefix.
    pub fn range_url(&self, prefix: &str) -> String {
        format!("{}/range/{}", self.base_url, prefix)
    }
}
