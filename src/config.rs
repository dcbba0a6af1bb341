//! Query context and configuration loading
//!
//! The query context is the immutable per-run configuration of the source:
//! search keyword, API key, base endpoint, and the request-policy knobs.
//! It is injected at construction time and read-only thereafter — the fetch
//! path never reads ambient global configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default search endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";

/// Default daily request limit
pub const DEFAULT_DAY_LIMIT: u32 = 4000;

/// Default spacing between requests, in seconds (10 requests/minute)
pub const DEFAULT_PACING_SECS: u64 = 6;

// ============================================================================
// Query Context
// ============================================================================

/// Immutable per-run configuration for the source
#[derive(Clone, Serialize, Deserialize)]
pub struct QueryContext {
    /// Search keyword
    pub keyword: String,

    /// API key (secret — masked in Debug output)
    pub api_key: String,

    /// Base endpoint URL for the search API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Daily request limit; exceeding it pauses the source until the next day
    #[serde(default = "default_day_limit")]
    pub day_limit: u32,

    /// Spacing between requests, in seconds. Zero disables pacing.
    #[serde(default = "default_pacing_secs")]
    pub pacing_interval_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_day_limit() -> u32 {
    DEFAULT_DAY_LIMIT
}

fn default_pacing_secs() -> u64 {
    DEFAULT_PACING_SECS
}

impl QueryContext {
    /// Create a context with default endpoint and request policy
    pub fn new(keyword: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            api_key: api_key.into(),
            base_url: default_base_url(),
            day_limit: DEFAULT_DAY_LIMIT,
            pacing_interval_secs: DEFAULT_PACING_SECS,
        }
    }

    /// Set the base endpoint URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the daily request limit
    #[must_use]
    pub fn with_day_limit(mut self, limit: u32) -> Self {
        self.day_limit = limit;
        self
    }

    /// Set the spacing between requests, in seconds (zero disables pacing)
    #[must_use]
    pub fn with_pacing_interval_secs(mut self, secs: u64) -> Self {
        self.pacing_interval_secs = secs;
        self
    }

    /// Spacing between requests as a `Duration`
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_secs(self.pacing_interval_secs)
    }

    /// Load a context from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(Error::Io)?;
        Self::from_yaml_str(&content)
    }

    /// Load a context from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let context: Self = serde_yaml::from_str(yaml)?;
        context.validate()?;
        Ok(context)
    }

    /// Validate the context
    pub fn validate(&self) -> Result<()> {
        if self.keyword.is_empty() {
            return Err(Error::missing_field("keyword"));
        }
        if self.api_key.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        Url::parse(&self.base_url)?;
        if self.day_limit == 0 {
            return Err(Error::invalid_value(
                "day_limit",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("keyword", &self.keyword)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("day_limit", &self.day_limit)
            .field("pacing_interval_secs", &self.pacing_interval_secs)
            .finish()
    }
}
