//! Embedding client for generating vector representations
//!
//! Talks to an Ollama-compatible embedding endpoint: any service accepting
//! `{model, prompt}` and returning `{embedding: [f32, ...]}` can be
//! substituted.

use async_trait::async_trait;
use lore_core::{LlmConfig, LoreError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Embedding Trait
// ============================================================================

/// Trait for embedding generation
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate an embedding vector for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

// ============================================================================
// Ollama Embedding Client
// ============================================================================

/// Ollama embedding API client
pub struct OllamaEmbedding {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedding {
    /// Create a new client against the given base URL
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoreError::Embedding(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Client for query-time embedding (shorter timeout)
    pub fn for_query(config: &LlmConfig) -> Result<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.embedding_model.clone(),
            Duration::from_secs(config.query_timeout_secs),
        )
    }

    /// Client for ingestion-time embedding.
    ///
    /// Uses the longer ingest timeout: embedding models can take tens of
    /// seconds on first load, and ingestion is a batch job.
    pub fn for_ingest(config: &LlmConfig) -> Result<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.embedding_model.clone(),
            Duration::from_secs(config.ingest_timeout_secs),
        )
    }

    /// The configured embedding model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| LoreError::Embedding(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LoreError::Embedding(format!(
                "server returned {status}: {error_text}"
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LoreError::Embedding(format!("failed to parse response: {e}")))?;

        if result.embedding.is_empty() {
            return Err(LoreError::Embedding("empty embedding returned".to_string()));
        }

        Ok(result.embedding)
    }
}

// ============================================================================
// Tests
// ============================================================================
