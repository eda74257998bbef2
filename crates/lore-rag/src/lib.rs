//! Lore RAG - query-time retrieval and context assembly
//!
//! The [`Retriever`] loads the persisted vector index once at construction
//! and serves similarity searches against it. Query-time failures never
//! propagate past this boundary: a missing index or a failed embedding call
//! degrades to "no relevant context found" so the generation collaborator
//! can still produce a best-effort answer.

pub mod llm;
pub mod prompt;

pub use llm::{ChatMessage, LlmClient, OllamaClient};
pub use prompt::{rag_prompt, PromptBuilder};

use lore_core::ScoredChunk;
use lore_vector::{EmbeddingClient, FlatIndex};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Separator between context blocks in the assembled string
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Candidates fetched when assembling context for a query
const CONTEXT_CANDIDATES: usize = 5;

/// Serves similarity searches over the persisted index.
///
/// The index is immutable once loaded; concurrent queries share it behind
/// an `Arc` without locking. Rebuilding requires a fresh process (or a new
/// `Retriever`) after re-running ingestion.
pub struct Retriever {
    index: Option<FlatIndex>,
    embedder: Arc<dyn EmbeddingClient>,
}

impl Retriever {
    /// Load the persisted index from `store_dir`.
    ///
    /// A missing or corrupt index pair leaves the retriever in a degraded
    /// but queryable state rather than failing construction.
    pub fn new(store_dir: &Path, embedder: Arc<dyn EmbeddingClient>) -> Self {
        let index = match FlatIndex::load(store_dir) {
            Ok(index) => {
                info!(
                    "loaded vector store with {} chunk(s) (dimension {})",
                    index.len(),
                    index.dimension()
                );
                Some(index)
            }
            Err(e) => {
                warn!("vector store not loaded: {e}; serving without context");
                None
            }
        };

        Self { index, embedder }
    }

    /// Whether both persisted artifacts were present and parseable
    pub fn is_available(&self) -> bool {
        self.index.is_some()
    }

    /// Number of indexed chunks (0 when unavailable)
    pub fn chunk_count(&self) -> usize {
        self.index.as_ref().map(FlatIndex::len).unwrap_or(0)
    }

    /// Search for the chunks most relevant to `query`.
    ///
    /// Returns an empty sequence when the index is unavailable (without
    /// any remote call) or when the query embedding fails.
    pub async fn search_documents(&self, query: &str, top_k: usize) -> Vec<ScoredChunk> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        debug!("searching for: {query}");

        let query_vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("query embedding failed: {e}");
                return Vec::new();
            }
        };

        let hits = match index.search(&query_vector, top_k) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("index search failed: {e}");
                return Vec::new();
            }
        };

        let results: Vec<ScoredChunk> = hits
            .into_iter()
            .filter_map(|(score, position)| {
                index.record(position).map(|metadata| ScoredChunk {
                    metadata: metadata.clone(),
                    score,
                })
            })
            .collect();

        debug!("found {} relevant chunk(s)", results.len());
        results
    }

    /// Assemble a context string for `query` under a character budget.
    ///
    /// Fetches the top candidates, formats each as
    /// `"From {file}:\n{content}\n"`, and greedily appends blocks in
    /// descending-score order, stopping before the block that would push
    /// the accumulated content length over `max_context_length`. Returns
    /// an empty string when nothing relevant is available.
    pub async fn get_context_for_query(&self, query: &str, max_context_length: usize) -> String {
        let results = self.search_documents(query, CONTEXT_CANDIDATES).await;
        if results.is_empty() {
            return String::new();
        }

        let mut parts = Vec::new();
        let mut current_length = 0;

        for result in results {
            let block = format!(
                "From {}:\n{}\n",
                result.metadata.file, result.metadata.content
            );
            if current_length + block.len() > max_context_length {
                break;
            }
            current_length += block.len();
            parts.push(block);
        }

        parts.join(CONTEXT_SEPARATOR)
    }
}

// ============================================================================
// Tests
// ============================================================================
