//! Request lifecycle events and the sinks that receive them.
//!
//! # Design
//! The facade reports every request as one `Start` event followed by exactly
//! one terminal event. Events are handed to an `EventSink` chosen when the
//! client is constructed; there is no global interceptor registry. Sinks are
//! observers only: `record` returns nothing and cannot influence the request.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Classification;
use crate::http::HttpMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Emitted right before the transport call, with the resolved timeout.
    Start { timeout: Duration },
    Success { status: u16, elapsed: Duration },
    Failure {
        classification: Classification,
        elapsed: Duration,
    },
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Start { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Shared by the start event and the terminal event of one request.
    pub request_id: Uuid,
    pub phase: Phase,
    pub method: HttpMethod,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Receiver of lifecycle events.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &LifecycleEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &LifecycleEvent) {
        (**self).record(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn record(&self, event: &LifecycleEvent) {
        (**self).record(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&self, event: &LifecycleEvent) {
        (**self).record(event)
    }
}

/// Logs events through `tracing` under the `quant_api_core::lifecycle` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &LifecycleEvent) {
        let method = event.method.as_str();
        let path = event.path.as_str();
        match &event.phase {
            Phase::Start { timeout } => tracing::info!(
                target: "quant_api_core::lifecycle",
                request_id = %event.request_id,
                method,
                path,
                timeout_ms = timeout.as_millis() as u64,
                "starting request"
            ),
            Phase::Success { status, elapsed } => tracing::info!(
                target: "quant_api_core::lifecycle",
                request_id = %event.request_id,
                method,
                path,
                status,
                elapsed_ms = elapsed.as_millis() as u64,
                "response received"
            ),
            Phase::Failure {
                classification: Classification::Timeout,
                elapsed,
            } => tracing::warn!(
                target: "quant_api_core::lifecycle",
                request_id = %event.request_id,
                method,
                path,
                elapsed_ms = elapsed.as_millis() as u64,
                "request timed out"
            ),
            Phase::Failure {
                classification: Classification::ServerError(status),
                elapsed,
            } => tracing::error!(
                target: "quant_api_core::lifecycle",
                request_id = %event.request_id,
                method,
                path,
                status,
                elapsed_ms = elapsed.as_millis() as u64,
                "HTTP error"
            ),
            Phase::Failure {
                classification: Classification::NetworkError,
                elapsed,
            } => tracing::error!(
                target: "quant_api_core::lifecycle",
                request_id = %event.request_id,
                method,
                path,
                elapsed_ms = elapsed.as_millis() as u64,
                "network error"
            ),
        }
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Events belonging to one request, in emission order.
    pub fn for_request(&self, request_id: Uuid) -> Vec<LifecycleEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.request_id == request_id)
            .collect()
    }

    pub fn last(&self) -> Option<LifecycleEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &LifecycleEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

/// Forwards each event to two sinks, first `A` then `B`.
#[derive(Debug, Clone, Default)]
pub struct FanoutSink<A, B> {
    first: A,
    second: B,
}

impl<A: EventSink, B: EventSink> FanoutSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink, B: EventSink> EventSink for FanoutSink<A, B> {
    fn record(&self, event: &LifecycleEvent) {
        self.first.record(event);
        self.second.record(event);
    }
}
