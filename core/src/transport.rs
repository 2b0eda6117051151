//! The seam between the facade and the network.
//!
//! # Design
//! A `Transport` executes one `HttpRequest` and answers with an
//! `HttpResponse` for any status code the server sends. It only fails when
//! no complete response arrived, and it must say whether that failure was
//! its own timeout firing (`TimedOut`) or anything else (`Network`). The
//! distinction comes from the transport's abort signal, never from error
//! message text.
//!
//! Once a status line has arrived the request is no longer a network
//! failure. A broken body on a non-2xx status still yields the response
//! (with whatever body is available, possibly empty). On a 2xx status it is
//! reported as `IncompleteBody` tagged with that status.

use std::future::Future;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failure to obtain a response at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,

    #[error("{0}")]
    Network(String),

    /// The status arrived but the body could not be read in full.
    #[error("HTTP {status}: incomplete body: {reason}")]
    IncompleteBody { status: u16, reason: String },
}

/// Executes HTTP requests on behalf of `ApiClient`.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport. Connection pooling is reqwest's default.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::TimedOut
        } else if err.is_connect() {
            TransportError::Network(format!("connection failed: {err}"))
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .timeout(request.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if !(200..300).contains(&status) => {
                tracing::debug!(status, error = %err, "error response body unreadable");
                String::new()
            }
            Err(err) if err.is_timeout() => return Err(TransportError::TimedOut),
            Err(err) => {
                return Err(TransportError::IncompleteBody {
                    status,
                    reason: err.to_string(),
                })
            }
        };

        Ok(HttpResponse { status, headers, body })
    }
}
