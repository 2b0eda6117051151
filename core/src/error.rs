//! Error types for the request facade.
//!
//! # Design
//! A failed request is classified exactly once, into `Timeout`, `Server` or
//! `Network`. Timeouts carry a user-facing message instead of the transport's
//! own error text, since callers render them directly. Server errors keep
//! the raw status code and body for the caller to render. `Serialization`,
//! `Deserialization` and `InvalidUrl` are local failures that happen before
//! dispatch or after a successful response, and have no classification.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// Taxonomy tag attached to a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "camelCase")]
pub enum Classification {
    Timeout,
    ServerError(u16),
    NetworkError,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Timeout => write!(f, "timeout"),
            Classification::ServerError(status) => write!(f, "server-error({status})"),
            Classification::NetworkError => write!(f, "network-error"),
        }
    }
}

/// Errors returned by `ApiClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The attempt ran past its resolved timeout and was abandoned.
    #[error("{message}")]
    Timeout {
        method: HttpMethod,
        path: String,
        timeout: Duration,
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// No response was received (connection refused, DNS failure, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A successful response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request path could not be joined onto the base URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn classification(&self) -> Option<Classification> {
        match self {
            ApiError::Timeout { .. } => Some(Classification::Timeout),
            ApiError::Server { status, .. } => Some(Classification::ServerError(*status)),
            ApiError::Network(_) => Some(Classification::NetworkError),
            ApiError::Serialization(_) | ApiError::Deserialization(_) | ApiError::InvalidUrl(_) => {
                None
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_displays_only_the_user_message() {
        let err = ApiError::Timeout {
            method: HttpMethod::Post,
            path: "/generate".to_string(),
            timeout: Duration::from_secs(60),
            message: "请求超时，请稍后重试".to_string(),
        };
        assert_eq!(err.to_string(), "请求超时，请稍后重试");
        assert_eq!(err.classification(), Some(Classification::Timeout));
        assert!(err.is_timeout());
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        let err = ApiError::Server {
            status: 404,
            body: r#"{"error":"HTML file not found"}"#.to_string(),
        };
        assert_eq!(err.classification(), Some(Classification::ServerError(404)));
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("HTML file not found"));
    }

    #[test]
    fn local_errors_are_unclassified() {
        assert_eq!(ApiError::Deserialization("eof".into()).classification(), None);
        assert_eq!(ApiError::Serialization("nan".into()).classification(), None);
        assert_eq!(ApiError::Network("refused".into()).classification(), Some(Classification::NetworkError));
    }

    #[test]
    fn classification_display_names() {
        assert_eq!(Classification::ServerError(502).to_string(), "server-error(502)");
        assert_eq!(Classification::NetworkError.to_string(), "network-error");
    }

    #[test]
    fn classification_serializes_with_status() {
        let json = serde_json::to_value(Classification::ServerError(500)).unwrap();
        assert_eq!(json["kind"], "serverError");
        assert_eq!(json["status"], 500);
    }
}
