use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub input: Option<String>,
    pub prompt_type: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub format: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_id: String,
    pub filename: String,
    pub prompt_type: Option<String>,
    pub original_input: Option<String>,
    pub created_at: String,
    pub content_length: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredFile {
    pub metadata: FileMetadata,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: String,
    pub filename: String,
    pub prompt_type: Option<String>,
    pub created_at: String,
    pub content_length: u64,
    pub original_input: Option<String>,
}

/// Failure injection applied in front of every `/api` route.
#[derive(Clone, Copy, Debug, Default)]
pub struct Faults {
    /// Delay before the request is handled.
    pub latency: Duration,
    /// Answer every request with this status instead of routing it.
    pub forced_status: Option<StatusCode>,
}

pub const PROMPTS: [&str; 3] = ["html", "markdown", "quant_trade"];

pub type Store = Arc<RwLock<HashMap<String, StoredFile>>>;

pub fn app() -> Router {
    app_with(Faults::default())
}

pub fn app_with(faults: Faults) -> Router {
    let store: Store = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/generate", post(generate))
        .route("/prompts", get(prompts))
        .route("/generate_quant_trade_strategy", post(generate_strategy))
        .route(
            "/generate_quant_trade_strategy/knowledge_bases",
            get(knowledge_bases),
        )
        .route("/html/files", get(list_files))
        .route("/html/files/{id}", get(get_file).delete(delete_file))
        .route("/html/files/{id}/view", get(view_file))
        .with_state(store)
        .layer(middleware::from_fn_with_state(faults, inject_faults));
    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Faults::default()).await
}

pub async fn run_with(listener: TcpListener, faults: Faults) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(faults)).await
}

async fn inject_faults(State(faults): State<Faults>, request: Request, next: Next) -> Response {
    if !faults.latency.is_zero() {
        tokio::time::sleep(faults.latency).await;
    }
    if let Some(status) = faults.forced_status {
        tracing::warn!(path = %request.uri().path(), %status, "injected failure");
        return (status, Json(json!({ "error": "injected failure" }))).into_response();
    }
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn generate(State(store): State<Store>, Json(input): Json<GenerateRequest>) -> Response {
    let Some(raw) = input.input else {
        return error(StatusCode::BAD_REQUEST, "Missing required field: input");
    };
    let text = raw.trim();
    if text.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Input cannot be empty");
    }

    if input.prompt_type.as_deref() == Some("html") {
        let content = format!("<!DOCTYPE html><html><body><p>{text}</p></body></html>");
        let file = save_file(&store, &content, input.prompt_type.clone(), text).await;
        tracing::info!(file_id = %file.metadata.file_id, "html content saved");
        return Json(GeneratedContent {
            format: "html".to_string(),
            content,
        })
        .into_response();
    }

    Json(GeneratedContent {
        format: "text".to_string(),
        content: format!("Generated: {text}"),
    })
    .into_response()
}

async fn save_file(store: &Store, content: &str, prompt_type: Option<String>, input: &str) -> StoredFile {
    let now = Utc::now();
    let file_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let file = StoredFile {
        metadata: FileMetadata {
            filename: format!("html_{}_{file_id}.html", now.format("%Y%m%d_%H%M%S")),
            file_id: file_id.clone(),
            prompt_type,
            original_input: Some(input.to_string()),
            created_at: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            content_length: content.chars().count() as u64,
        },
        content: content.to_string(),
    };
    store.write().await.insert(file_id, file.clone());
    file
}

async fn prompts() -> Json<Value> {
    Json(json!({ "prompts": PROMPTS, "default": null }))
}

async fn generate_strategy(Json(input): Json<Value>) -> Response {
    let Some(fields) = input.as_object() else {
        return error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
    };
    if fields.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Missing strategy description");
    }
    Json(json!({
        "format": "markdown",
        "content": "```python\n# moving average crossover\n```",
        "implementation_steps": "1. 数据获取\n2. 指标计算\n3. 策略实现\n4. 回测和优化",
        "knowledge_base_used": "quant_trade_api_doc",
    }))
    .into_response()
}

async fn knowledge_bases() -> Json<Value> {
    Json(json!({
        "knowledge_bases": [
            { "id": "kb-001", "name": "quant_trade_api_doc" }
        ]
    }))
}

fn truncate_input(input: &str) -> String {
    if input.chars().count() > 100 {
        let head: String = input.chars().take(100).collect();
        format!("{head}...")
    } else {
        input.to_string()
    }
}

async fn list_files(State(store): State<Store>) -> Json<Vec<FileSummary>> {
    let files = store.read().await;
    let mut summaries: Vec<FileSummary> = files
        .values()
        .map(|file| FileSummary {
            file_id: file.metadata.file_id.clone(),
            filename: file.metadata.filename.clone(),
            prompt_type: file.metadata.prompt_type.clone(),
            created_at: file.metadata.created_at.clone(),
            content_length: file.metadata.content_length,
            original_input: file.metadata.original_input.as_deref().map(truncate_input),
        })
        .collect();
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(summaries)
}

async fn get_file(State(store): State<Store>, Path(id): Path<String>) -> Response {
    match store.read().await.get(&id) {
        Some(file) => Json(file.clone()).into_response(),
        None => {
            tracing::warn!(file_id = %id, "html file not found");
            error(StatusCode::NOT_FOUND, "HTML file not found")
        }
    }
}

async fn delete_file(State(store): State<Store>, Path(id): Path<String>) -> Response {
    match store.write().await.remove(&id) {
        Some(_) => {
            tracing::info!(file_id = %id, "html file deleted");
            Json(json!({ "message": "HTML file deleted successfully" })).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "HTML file not found"),
    }
}

async fn view_file(State(store): State<Store>, Path(id): Path<String>) -> Response {
    match store.read().await.get(&id) {
        Some(file) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            file.content.clone(),
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "HTML file not found"),
    }
}
