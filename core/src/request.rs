//! Logical request descriptors.
//!
//! # Design
//! A `RequestDescriptor` is what a caller wants (method, path, payload,
//! category, optional timeout), before the facade turns it into an
//! `HttpRequest`. Timeout resolution lives here so it can be tested without
//! a client: explicit override, then the category's table entry, then the
//! default entry. A zero override counts as "no override", because a zero
//! deadline would abort every request before it starts.
//!
//! Paths given as a string are split on `/`. Descriptors built with
//! `from_segments` keep each entry as exactly one URL segment, so an id that
//! contains `/` cannot address a different endpoint.

use std::time::Duration;

use crate::category::{RequestCategory, TimeoutTable};
use crate::http::HttpMethod;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, e.g. `/html/files/42`.
    pub path: String,
    pub payload: Option<serde_json::Value>,
    pub category: Option<RequestCategory>,
    pub timeout_override: Option<Duration>,
    segments: Option<Vec<String>>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            category: None,
            timeout_override: None,
            segments: None,
        }
    }

    /// Descriptor whose URL is built from `segments`, one segment each.
    pub fn from_segments(method: HttpMethod, segments: &[&str]) -> Self {
        Self {
            segments: Some(segments.iter().map(|s| s.to_string()).collect()),
            ..Self::new(method, format!("/{}", segments.join("/")))
        }
    }

    /// Segments to append to the base URL.
    pub fn segments(&self) -> Vec<&str> {
        match &self.segments {
            Some(segments) => segments.iter().map(String::as_str).collect(),
            None => self.path.split('/').filter(|s| !s.is_empty()).collect(),
        }
    }

    /// Whether the segments were given explicitly and must be kept whole.
    pub fn has_explicit_segments(&self) -> bool {
        self.segments.is_some()
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_category(mut self, category: RequestCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.category = options.category.or(self.category);
        self.timeout_override = options.timeout.or(self.timeout_override);
        self
    }

    pub fn resolve_timeout(&self, table: &TimeoutTable) -> Duration {
        match self.timeout_override {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => table.get(self.category.unwrap_or_default()),
        }
    }
}

/// Per-call options accepted by the verb helpers on `ApiClient`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub category: Option<RequestCategory>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn category(category: RequestCategory) -> Self {
        Self {
            category: Some(category),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
