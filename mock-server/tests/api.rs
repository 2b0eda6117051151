use std::time::Duration;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, FileSummary, Faults, StoredFile};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- health / prompts ---

#[tokio::test]
async fn health_is_outside_api_prefix() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn prompts_lists_catalog() {
    let resp = app().oneshot(get("/api/prompts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["prompts"].as_array().unwrap().len(), 3);
    assert!(body["default"].is_null());
}

// --- generate ---

#[tokio::test]
async fn generate_text() {
    let resp = app()
        .oneshot(json_request("POST", "/api/generate", r#"{"input":"hello"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["format"], "text");
    assert_eq!(body["content"], "Generated: hello");
}

#[tokio::test]
async fn generate_missing_input_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/generate", r#"{"prompt_type":"html"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Missing required field: input");
}

#[tokio::test]
async fn generate_blank_input_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/generate", r#"{"input":"   "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- quant strategy ---

#[tokio::test]
async fn generate_strategy_returns_markdown() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/generate_quant_trade_strategy",
            r#"{"strategy":"x"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["format"], "markdown");
    assert_eq!(body["knowledge_base_used"], "quant_trade_api_doc");
}

#[tokio::test]
async fn generate_strategy_rejects_empty_object() {
    let resp = app()
        .oneshot(json_request("POST", "/api/generate_quant_trade_strategy", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn knowledge_bases_listed() {
    let resp = app()
        .oneshot(get("/api/generate_quant_trade_strategy/knowledge_bases"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["knowledge_bases"][0]["name"], "quant_trade_api_doc");
}

// --- files ---

#[tokio::test]
async fn file_not_found() {
    let resp = app().oneshot(get("/api/html/files/deadbeef")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_file_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/html/files/deadbeef")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- fault injection ---

#[tokio::test]
async fn forced_status_short_circuits_routing() {
    let faults = Faults {
        forced_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Faults::default()
    };
    let resp = app_with(faults).oneshot(get("/api/prompts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = app_with(faults).oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn latency_delays_response() {
    let faults = Faults {
        latency: Duration::from_secs(301),
        ..Faults::default()
    };
    let started = tokio::time::Instant::now();
    let resp = app_with(faults).oneshot(get("/api/prompts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_secs(301));
}

// --- full file lifecycle ---

#[tokio::test]
async fn html_file_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // generate html: saves a file
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/generate",
            r#"{"input":"landing page","prompt_type":"html"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let generated: Value = body_json(resp).await;
    assert_eq!(generated["format"], "html");

    // list: one file
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/html/files"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let files: Vec<FileSummary> = body_json(resp).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].original_input.as_deref(), Some("landing page"));
    let id = files[0].file_id.clone();

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/html/files/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let file: StoredFile = body_json(resp).await;
    assert_eq!(file.metadata.file_id, id);
    assert_eq!(file.content, generated["content"]);

    // view: raw html
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/html/files/{id}/view")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = body_bytes(resp).await;
    assert!(html.starts_with(b"<!DOCTYPE html>"));

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/html/files/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/html/files/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/html/files"))
        .await
        .unwrap();
    let files: Vec<FileSummary> = body_json(resp).await;
    assert!(files.is_empty());
}
