//! Range query transport.

use std::future::Future;

use super::BreachError;
use crate::config::BreachConfig;

/// Fetches the range response body for a 5-character hash prefix.
pub trait RangeSource: Send + Sync {
    fn fetch_range(&self, prefix: &str) -> impl Future<Output = Result<String, BreachError>> + Send;
}

/// [`RangeSource`] backed by the Pwned Passwords HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRangeSource {
    client: reqwest::Client,
    config: BreachConfig,
}

impl HttpRangeSource {
    /// Builds the HTTP client with the configured timeout and user agent.
    pub fn new(config: BreachConfig) -> Result<Self, BreachError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(BreachError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BreachConfig {
        &self.config
    }
}

impl RangeSource for HttpRangeSource {
    async fn fetch_range(&self, prefix: &str) -> Result<String, BreachError> {
        let request_error = |source| BreachError::Request {
            prefix: prefix.to_string(),
            source,
        };

        let mut request = self.client.get(self.config.range_url(prefix));
        if let Some(key) = &self.config.api_key {
            request = request.header("hibp-api-key", key);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BreachError::Status {
                prefix: prefix.to_string(),
                status,
            });
        }

        response.text().await.map_err(request_error)
    }
}
