//! Client configuration.
//!
//! # Design
//! `ClientConfig` is deserializable so a host application can embed it in its
//! own TOML file, but the crate never reads files or the environment itself.
//! Validation happens once, when the facade is constructed; after that the
//! config is only reachable through a shared reference.

use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::category::TimeoutTable;

/// User-facing message attached to timed-out requests.
pub const DEFAULT_TIMEOUT_MESSAGE: &str = "请求超时，请稍后重试";

/// Errors raised while loading or validating a `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Absolute base URL every request path is joined onto, e.g.
    /// `http://localhost:5000/api`.
    pub base_url: String,

    pub timeouts: TimeoutTable,

    /// Headers attached to every request.
    pub default_headers: Vec<(String, String)>,

    /// Replaces the transport error text when a request times out.
    pub timeout_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeouts: TimeoutTable::default(),
            default_headers: Vec::new(),
            timeout_message: DEFAULT_TIMEOUT_MESSAGE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutTable) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.default_headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_timeout_message(mut self, message: &str) -> Self {
        self.timeout_message = message.to_string();
        self
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: ClientConfig = toml::from_str(content)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Check the config and return the parsed base URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must use http or https, got {}",
                base.scheme()
            )));
        }
        let zero = self.timeouts.zero_entries();
        if !zero.is_empty() {
            let names: Vec<&str> = zero.iter().map(|c| c.as_str()).collect();
            return Err(ConfigError::Invalid(format!(
                "timeouts must be greater than zero: {}",
                names.join(", ")
            )));
        }
        if self.timeout_message.trim().is_empty() {
            return Err(ConfigError::Invalid("timeout_message must not be empty".to_string()));
        }
        for (key, value) in &self.default_headers {
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ConfigError::Invalid(format!("invalid header name {key:?}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| ConfigError::Invalid(format!("invalid value for header {key:?}")))?;
        }
        Ok(base)
    }
}
