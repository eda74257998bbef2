//! Request handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use lore_core::ScoredChunk;
use lore_rag::ChatMessage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub index_available: bool,
    pub indexed_chunks: usize,
    pub uptime_seconds: u64,
}

/// Liveness probe surfacing the configured model and index state
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.llm.model.clone(),
        index_available: state.retriever.is_available(),
        indexed_chunks: state.retriever.chunk_count(),
        uptime_seconds: state.uptime_secs(),
    })
}

// ============================================================================
// Config
// ============================================================================

/// Non-sensitive configuration subset, for debugging
#[derive(Serialize)]
pub struct ConfigResponse {
    pub ollama_url: String,
    pub model: String,
    pub embedding_model: String,
    pub vector_store_path: String,
    pub top_k: usize,
    pub max_context_length: usize,
}

pub async fn config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    let c = &state.config;
    Json(ConfigResponse {
        ollama_url: c.llm.ollama_url.clone(),
        model: c.llm.model.clone(),
        embedding_model: c.llm.embedding_model.clone(),
        vector_store_path: c.store.vector_store_path.display().to_string(),
        top_k: c.retrieval.top_k,
        max_context_length: c.retrieval.max_context_length,
    })
}

// ============================================================================
// Search
// ============================================================================

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub query: String,

    /// Number of results; defaults to the configured top_k
    pub top_k: Option<usize>,
}

/// Search response body
#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredChunk>,
    pub count: usize,
}

/// Similarity search over the indexed corpus.
///
/// An unavailable index or a failed query embedding yields an empty result
/// list, not an error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    state.increment_requests();

    if req.query.trim().is_empty() {
        return Err(AppError::BadRequest("query cannot be empty".to_string()));
    }

    let top_k = req.top_k.unwrap_or(state.config.retrieval.top_k);
    let results = state.retriever.search_documents(&req.query, top_k).await;
    let count = results.len();

    Ok(Json(SearchResponse { results, count }))
}

// ============================================================================
// Chat
// ============================================================================

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User's message
    pub message: String,
}

/// Chat response body
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Whether retrieved document context grounded the answer
    pub context_used: bool,
}

/// Answer a message, grounded in retrieved context when available
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    state.increment_requests();

    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let context = state
        .retriever
        .get_context_for_query(&req.message, state.config.retrieval.max_context_length)
        .await;
    let context_used = !context.is_empty();

    let system = if context_used {
        format!(
            "You are a personal document assistant. Answer using only the \
             following context. If the context does not contain the answer, \
             say so.\n\n{context}"
        )
    } else {
        "You are a personal document assistant. No documents are currently \
         indexed. Tell the user that no documents are loaded and answer \
         from general knowledge only if they ask you to."
            .to_string()
    };

    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(req.message.as_str()),
    ];
    let response = state.llm.chat(&messages).await?;

    Ok(Json(ChatResponse {
        response,
        context_used,
    }))
}
