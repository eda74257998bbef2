//! LLM client for the generation/chat collaborator
//!
//! Talks to the Ollama generate and chat APIs. Consumed as a black box:
//! the retrieval pipeline hands it a fully assembled prompt or message
//! list and takes back the response text.

use async_trait::async_trait;
use lore_core::{LlmConfig, LoreError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for text generation
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a reply for a chat message list
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// One message in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Ollama Client
// ============================================================================

/// Ollama generation API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

impl OllamaClient {
    /// Create a new client against the given base URL
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoreError::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Create from config, using the query timeout
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.query_timeout_secs),
        )
    }

    /// The configured generation model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check whether the server is running and reachable.
    ///
    /// Uses a short timeout independent of the generation timeout.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| LoreError::Llm(format!("generate request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LoreError::Llm(format!(
                "server returned {status}: {error_text}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LoreError::Llm(format!("failed to parse generate response: {e}")))?;

        Ok(result.response)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| LoreError::Llm(format!("chat request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LoreError::Llm(format!(
                "server returned {status}: {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| LoreError::Llm(format!("failed to parse chat response: {e}")))?;

        Ok(result.message.content)
    }
}

// ============================================================================
// Tests
// ============================================================================
