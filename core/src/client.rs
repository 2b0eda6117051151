//! Categorized request facade.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig`, a `Transport` and an
//! `EventSink`, and carries no mutable state between calls, so concurrent
//! requests never share or wait on each other. Every call goes through
//! `request`:
//!
//! 1. `build_request` resolves the timeout and produces an `HttpRequest`
//!    (pure, no I/O).
//! 2. A `Start` event is recorded.
//! 3. The transport runs under `tokio::time::timeout` with the resolved
//!    deadline.
//! 4. The outcome is classified and exactly one terminal event is recorded.
//!
//! There are no retries; each request is a single attempt.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use url::Url;
use uuid::Uuid;

use crate::category::TimeoutTable;
use crate::config::{ClientConfig, ConfigError};
use crate::endpoints::{ChatApi, FileApi, QuantApi};
use crate::error::{ApiError, Classification};
use crate::event::{EventSink, LifecycleEvent, Phase, TracingSink};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::{RequestDescriptor, RequestOptions};
use crate::transport::{ReqwestTransport, Transport, TransportError};

pub struct ApiClient<T, S = TracingSink> {
    config: ClientConfig,
    base: Url,
    transport: T,
    sink: S,
}

impl ApiClient<ReqwestTransport, TracingSink> {
    /// Client over a fresh `reqwest` pool, logging through `tracing`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, ReqwestTransport::new(), TracingSink)
    }
}

impl<T: Transport> ApiClient<T, TracingSink> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Self::with_sink(config, transport, TracingSink)
    }
}

impl<T: Transport, S: EventSink> ApiClient<T, S> {
    pub fn with_sink(config: ClientConfig, transport: T, sink: S) -> Result<Self, ConfigError> {
        let base = config.validate()?;
        Ok(Self {
            config,
            base,
            transport,
            sink,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeouts(&self) -> &TimeoutTable {
        &self.config.timeouts
    }

    pub fn chat(&self) -> ChatApi<'_, T, S> {
        ChatApi::new(self)
    }

    pub fn quant(&self) -> QuantApi<'_, T, S> {
        QuantApi::new(self)
    }

    pub fn files(&self) -> FileApi<'_, T, S> {
        FileApi::new(self)
    }

    /// Turn a descriptor into the wire request the transport will execute.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ApiError> {
        let url = self.join_url(descriptor)?;
        let mut headers = self.config.default_headers.clone();
        let body = match &descriptor.payload {
            Some(payload) => {
                let body = serde_json::to_string(payload)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?;
                if !headers.iter().any(|(key, _)| key.eq_ignore_ascii_case("content-type")) {
                    headers.push(("content-type".to_string(), "application/json".to_string()));
                }
                Some(body)
            }
            None => None,
        };
        Ok(HttpRequest {
            method: descriptor.method,
            url,
            headers,
            body,
            timeout: descriptor.resolve_timeout(&self.config.timeouts),
        })
    }

    /// Dispatch one request and classify its outcome.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(&descriptor)?;
        let RequestDescriptor { method, path, .. } = descriptor;
        let timeout = request.timeout;
        let request_id = Uuid::new_v4();

        self.emit(request_id, method, &path, Phase::Start { timeout });
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.transport.execute(request)).await;
        let elapsed = started.elapsed();

        let (phase, result) = match outcome {
            Ok(Ok(response)) if response.is_success() => (
                Phase::Success {
                    status: response.status,
                    elapsed,
                },
                Ok(response),
            ),
            Ok(Ok(response)) => (
                Phase::Failure {
                    classification: Classification::ServerError(response.status),
                    elapsed,
                },
                Err(ApiError::Server {
                    status: response.status,
                    body: response.body,
                }),
            ),
            Ok(Err(TransportError::IncompleteBody { status, reason })) => (
                Phase::Success { status, elapsed },
                Err(ApiError::Deserialization(format!(
                    "HTTP {status}: incomplete body: {reason}"
                ))),
            ),
            Ok(Err(TransportError::Network(reason))) => (
                Phase::Failure {
                    classification: Classification::NetworkError,
                    elapsed,
                },
                Err(ApiError::Network(reason)),
            ),
            Ok(Err(TransportError::TimedOut)) | Err(_) => (
                Phase::Failure {
                    classification: Classification::Timeout,
                    elapsed,
                },
                Err(ApiError::Timeout {
                    method,
                    path: path.clone(),
                    timeout,
                    message: self.config.timeout_message.clone(),
                }),
            ),
        };
        self.emit(request_id, method, &path, phase);
        result
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Get, path).with_options(options))
            .await
    }

    pub async fn post<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let payload = to_payload(payload)?;
        self.request(
            RequestDescriptor::new(HttpMethod::Post, path)
                .with_payload(payload)
                .with_options(options),
        )
        .await
    }

    pub async fn put<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let payload = to_payload(payload)?;
        self.request(
            RequestDescriptor::new(HttpMethod::Put, path)
                .with_payload(payload)
                .with_options(options),
        )
        .await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        self.request(RequestDescriptor::new(HttpMethod::Delete, path).with_options(options))
            .await
    }

    /// Join the descriptor's segments onto the base URL, percent-encoding
    /// each one. Explicit segments must be non-empty and not `.` or `..`.
    fn join_url(&self, descriptor: &RequestDescriptor) -> Result<String, ApiError> {
        let parts = descriptor.segments();
        if descriptor.has_explicit_segments() {
            if let Some(bad) = parts.iter().find(|s| matches!(**s, "" | "." | "..")) {
                return Err(ApiError::InvalidUrl(format!(
                    "{:?} is not a valid path segment in {}",
                    bad, descriptor.path
                )));
            }
        }
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.config.base_url.clone()))?;
            segments.pop_if_empty();
            segments.extend(parts);
        }
        Ok(url.to_string())
    }

    fn emit(&self, request_id: Uuid, method: HttpMethod, path: &str, phase: Phase) {
        self.sink.record(&LifecycleEvent {
            request_id,
            phase,
            method,
            path: path.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }
}

/// Decode a successful response body.
pub fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn to_payload<P: Serialize + ?Sized>(payload: &P) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}
