//! Domain DTOs for the content-generation API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently,
//! so integration tests catch any drift between the two crates. Optional
//! fields default when absent; the back-end omits several of them depending
//! on which generation path ran.

use serde::{Deserialize, Serialize};

/// Payload for `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<String>,
}

impl GenerateRequest {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            prompt_type: None,
        }
    }

    pub fn with_prompt_type(mut self, prompt_type: &str) -> Self {
        self.prompt_type = Some(prompt_type.to_string());
        self
    }
}

/// Generated content; `format` is `text`, `markdown` or `html`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedContent {
    pub format: String,
    pub content: String,
}

/// Response of `GET /prompts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptCatalog {
    pub prompts: Vec<String>,
    #[serde(default)]
    pub default: Option<String>,
}

/// Response of `POST /generate_quant_trade_strategy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyResult {
    pub format: String,
    pub content: String,
    #[serde(default)]
    pub implementation_steps: Option<String>,
    #[serde(default)]
    pub knowledge_base_used: Option<String>,
    /// Set when the back-end fell back to a canned strategy.
    #[serde(default)]
    pub error: Option<String>,
}

/// One entry of `GET /html/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HtmlFileSummary {
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub prompt_type: Option<String>,
    pub created_at: String,
    pub content_length: u64,
    #[serde(default)]
    pub original_input: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HtmlFileMetadata {
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub prompt_type: Option<String>,
    #[serde(default)]
    pub original_input: Option<String>,
    pub created_at: String,
    pub content_length: u64,
}

/// Response of `GET /html/files/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HtmlFile {
    pub metadata: HtmlFileMetadata,
    pub content: String,
}
