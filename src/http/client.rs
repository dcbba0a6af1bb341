//! Thin HTTP GET client for the search endpoint
//!
//! One job: issue a GET with query parameters and an
//! `Accept: application/json` header, and hand back the parsed JSON body.
//! Any transport failure, non-success status, or unparseable body is fatal
//! and propagated — there is no retry loop here. The only wait rules the
//! source applies live in `rate_limit`.

use crate::error::{Error, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Configuration for the search client
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("articlesearch-source/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for the search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    config: SearchClientConfig,
}

impl SearchClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(SearchClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: SearchClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Issue a GET request and parse the JSON response body.
    ///
    /// Returns `Error::HttpStatus` for any non-2xx status, `Error::Transport`
    /// for network failures, and `Error::JsonParse` for unparseable bodies.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(query)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: GET {url}");
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}
