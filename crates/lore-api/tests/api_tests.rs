//! API integration tests
//!
//! Exercise the router end to end against a retriever with no persisted
//! index and stubbed collaborators: the serving path must degrade, never
//! crash, when the vector store is missing.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lore_api::{create_router, AppState};
use lore_core::{AppConfig, LoreError, Result};
use lore_rag::{ChatMessage, LlmClient, Retriever};
use lore_vector::EmbeddingClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Proves the degraded retriever never issues a remote embedding call
struct PanickingEmbedder;

#[async_trait]
impl EmbeddingClient for PanickingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        panic!("embedding must not be called without an index");
    }
}

/// Canned generation collaborator
struct CannedLlm;

#[async_trait]
impl LlmClient for CannedLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("canned generation".to_string())
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        assert!(messages.iter().any(|m| m.role == "system"));
        Ok("no documents are loaded".to_string())
    }
}

/// Collaborator that always fails
struct BrokenLlm;

#[async_trait]
impl LlmClient for BrokenLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(LoreError::Llm("model not running".to_string()))
    }

    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String> {
        Err(LoreError::Llm("model not running".to_string()))
    }
}

fn router_without_index(llm: Arc<dyn LlmClient>) -> (axum::Router, tempfile::TempDir) {
    let store = tempfile::tempdir().unwrap();
    let retriever = Arc::new(Retriever::new(store.path(), Arc::new(PanickingEmbedder)));
    assert!(!retriever.is_available());

    let state = Arc::new(AppState::new(AppConfig::default(), retriever, llm));
    (create_router(state), store)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_missing_index() {
    let (app, _store) = router_without_index(Arc::new(CannedLlm));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["index_available"], false);
    assert_eq!(json["indexed_chunks"], 0);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn config_exposes_non_sensitive_subset() {
    let (app, _store) = router_without_index(Arc::new(CannedLlm));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ollama_url"], "http://localhost:11434");
    assert_eq!(json["top_k"], 5);
    assert_eq!(json["max_context_length"], 2000);
}

#[tokio::test]
async fn search_on_missing_index_returns_empty_not_error() {
    let (app, _store) = router_without_index(Arc::new(CannedLlm));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/search",
            json!({ "query": "where are my notes" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn blank_search_query_is_rejected() {
    let (app, _store) = router_without_index(Arc::new(CannedLlm));

    let response = app
        .oneshot(json_request("POST", "/api/search", json!({ "query": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn chat_degrades_to_no_context() {
    let (app, _store) = router_without_index(Arc::new(CannedLlm));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "message": "what do my notes say?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["context_used"], false);
    assert_eq!(json["response"], "no documents are loaded");
}

#[tokio::test]
async fn llm_failure_maps_to_bad_gateway() {
    let (app, _store) = router_without_index(Arc::new(BrokenLlm));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "message": "hello" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LLM_ERROR");
}
