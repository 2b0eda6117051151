//! Categorized HTTP client facade for the content-generation API.
//!
//! # Overview
//! Callers describe a request logically (method, path, payload, category)
//! and `ApiClient` resolves the timeout for that category, dispatches it
//! through a `Transport`, classifies the outcome as success, timeout, server
//! error or network error, and reports the lifecycle to an `EventSink`.
//!
//! # Design
//! - The category → timeout table is part of an immutable `ClientConfig`
//!   fixed at construction.
//! - `build_request` is pure and produces plain-data `HttpRequest` values; the
//!   transport does the I/O. `ReqwestTransport` is the production transport.
//! - Logging is an injected sink (`TracingSink` by default), not a global
//!   interceptor.
//! - Typed endpoint groups (`chat()`, `quant()`, `files()`) pin each back-end
//!   endpoint to its category.

pub mod category;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod event;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use category::{RequestCategory, TimeoutTable, UnknownCategory};
pub use client::{parse_json, ApiClient};
pub use config::{ClientConfig, ConfigError, DEFAULT_TIMEOUT_MESSAGE};
pub use endpoints::{ChatApi, FileApi, QuantApi};
pub use error::{ApiError, Classification};
pub use event::{EventSink, FanoutSink, LifecycleEvent, Phase, RecordingSink, TracingSink};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{RequestDescriptor, RequestOptions};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{
    GenerateRequest, GeneratedContent, HtmlFile, HtmlFileMetadata, HtmlFileSummary, PromptCatalog,
    StrategyResult,
};
