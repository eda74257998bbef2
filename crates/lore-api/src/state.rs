//! Application state shared across handlers

use lore_core::AppConfig;
use lore_rag::{LlmClient, Retriever};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared state behind an `Arc`.
///
/// The retriever's index is loaded once at construction and never mutated;
/// concurrent requests read it without locking. Rebuilding the index means
/// re-running ingestion and restarting the server.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Server start time
    pub start_time: Instant,

    /// Request counter
    pub request_count: AtomicU64,

    /// Query-time retriever
    pub retriever: Arc<Retriever>,

    /// Generation collaborator
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, retriever: Arc<Retriever>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            retriever,
            llm,
        }
    }

    /// Increment and return the request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
