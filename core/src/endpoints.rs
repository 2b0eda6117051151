//! Typed endpoint groups.
//!
//! Each method pins the HTTP method, path and category of one back-end
//! endpoint and delegates to `ApiClient`, so no endpoint can skip timeout
//! resolution or outcome classification.

use serde::Serialize;

use crate::category::RequestCategory;
use crate::client::{parse_json, ApiClient};
use crate::error::ApiError;
use crate::event::EventSink;
use crate::http::HttpMethod;
use crate::request::{RequestDescriptor, RequestOptions};
use crate::transport::Transport;
use crate::types::{
    GenerateRequest, GeneratedContent, HtmlFile, HtmlFileSummary, PromptCatalog, StrategyResult,
};

/// Content generation and prompt catalog.
pub struct ChatApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: Transport, S: EventSink> ChatApi<'a, T, S> {
    pub(crate) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// `POST /generate`
    pub async fn generate(&self, input: &GenerateRequest) -> Result<GeneratedContent, ApiError> {
        let response = self
            .client
            .post("/generate", input, RequestOptions::category(RequestCategory::Chat))
            .await?;
        parse_json(&response)
    }

    /// `GET /prompts`
    pub async fn prompts(&self) -> Result<PromptCatalog, ApiError> {
        let response = self
            .client
            .get("/prompts", RequestOptions::category(RequestCategory::Default))
            .await?;
        parse_json(&response)
    }
}

/// Quantitative trading strategy generation.
pub struct QuantApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: Transport, S: EventSink> QuantApi<'a, T, S> {
    pub(crate) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// `POST /generate_quant_trade_strategy`
    pub async fn generate_strategy<P: Serialize + ?Sized>(
        &self,
        payload: &P,
    ) -> Result<StrategyResult, ApiError> {
        let response = self
            .client
            .post(
                "/generate_quant_trade_strategy",
                payload,
                RequestOptions::category(RequestCategory::LongRunningComputation),
            )
            .await?;
        parse_json(&response)
    }

    /// `GET /generate_quant_trade_strategy/knowledge_bases`
    ///
    /// The listing is passed through from the upstream knowledge service
    /// without a fixed schema.
    pub async fn knowledge_bases(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(
                "/generate_quant_trade_strategy/knowledge_bases",
                RequestOptions::category(RequestCategory::KnowledgeLookup),
            )
            .await?;
        parse_json(&response)
    }
}

/// Saved HTML documents.
pub struct FileApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: Transport, S: EventSink> FileApi<'a, T, S> {
    pub(crate) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    fn options() -> RequestOptions {
        RequestOptions::category(RequestCategory::FileOperation)
    }

    /// `file_id` always lands in a single path segment.
    fn file_request(method: HttpMethod, file_id: &str, tail: Option<&str>) -> RequestDescriptor {
        let mut segments = vec!["html", "files", file_id];
        segments.extend(tail);
        RequestDescriptor::from_segments(method, &segments).with_options(Self::options())
    }

    /// `GET /html/files`, newest first.
    pub async fn list(&self) -> Result<Vec<HtmlFileSummary>, ApiError> {
        let response = self.client.get("/html/files", Self::options()).await?;
        parse_json(&response)
    }

    /// `GET /html/files/{id}`
    pub async fn get(&self, file_id: &str) -> Result<HtmlFile, ApiError> {
        let response = self
            .client
            .request(Self::file_request(HttpMethod::Get, file_id, None))
            .await?;
        parse_json(&response)
    }

    /// `DELETE /html/files/{id}`
    pub async fn delete(&self, file_id: &str) -> Result<(), ApiError> {
        self.client
            .request(Self::file_request(HttpMethod::Delete, file_id, None))
            .await?;
        Ok(())
    }

    /// `GET /html/files/{id}/view`, the raw HTML document.
    pub async fn view(&self, file_id: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .request(Self::file_request(HttpMethod::Get, file_id, Some("view")))
            .await?;
        Ok(response.body)
    }
}
