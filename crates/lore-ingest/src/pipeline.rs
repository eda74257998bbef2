//! The ingestion pipeline
//!
//! One-shot batch job: discover documents, chunk, embed, build the index,
//! persist it atomically. Never expected to run concurrently with itself;
//! rebuilding means re-running from scratch.

use crate::chunker::chunk_text;
use crate::document::{discover_documents, load_document};
use lore_core::{ChunkMetadata, IngestConfig, LoreError, StoreConfig};
use lore_vector::{EmbeddingClient, FlatIndex};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that terminate an ingestion run
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source directory held no supported documents
    #[error("no documents found under {0}")]
    NoDocuments(PathBuf),

    /// Documents were found but not a single chunk embedded successfully
    #[error("no embeddings generated from {documents} document(s)")]
    NoEmbeddings { documents: usize },

    /// Index construction or persistence failed
    #[error(transparent)]
    Index(#[from] LoreError),
}

/// Counters reported after a completed run
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Supported documents discovered under the source directory
    pub documents_found: usize,

    /// Documents whose content was actually read
    pub documents_loaded: usize,

    /// Chunks produced by the chunker
    pub chunks_total: usize,

    /// Chunks embedded and indexed
    pub chunks_embedded: usize,

    /// Chunks skipped because their embedding call failed
    pub chunks_failed: usize,

    /// Embedding dimension of the built index
    pub dimension: usize,
}

/// Builds and persists the vector index from a document directory
pub struct IngestPipeline {
    source_dir: PathBuf,
    store_dir: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IngestPipeline {
    /// Create a pipeline from configuration
    pub fn new(ingest: &IngestConfig, store: &StoreConfig) -> Self {
        Self {
            source_dir: ingest.source_dir.clone(),
            store_dir: store.vector_store_path.clone(),
            chunk_size: ingest.chunk_size,
            chunk_overlap: ingest.chunk_overlap,
        }
    }

    /// Override the source directory
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Run the full pipeline: discover, chunk, embed, persist.
    ///
    /// Per-document read failures and per-chunk embedding failures are
    /// logged and skipped. If nothing embeds, no index is written and any
    /// previously persisted index stays untouched.
    pub async fn run(&self, embedder: &dyn EmbeddingClient) -> Result<IngestSummary, IngestError> {
        let documents = discover_documents(&self.source_dir);
        if documents.is_empty() {
            return Err(IngestError::NoDocuments(self.source_dir.clone()));
        }

        info!(
            "ingesting {} document(s) from {}",
            documents.len(),
            self.source_dir.display()
        );

        let mut summary = IngestSummary {
            documents_found: documents.len(),
            ..IngestSummary::default()
        };
        let mut vectors = Vec::new();
        let mut metadata = Vec::new();

        for path in &documents {
            let text = match load_document(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("skipping document: {e}");
                    continue;
                }
            };
            summary.documents_loaded += 1;

            let chunks = chunk_text(&text, self.chunk_size, self.chunk_overlap);
            debug!("{}: {} chunk(s)", path.display(), chunks.len());
            summary.chunks_total += chunks.len();

            let file = file_name_of(path);
            for (chunk_id, chunk) in chunks.into_iter().enumerate() {
                match embedder.embed(&chunk).await {
                    Ok(vector) => {
                        vectors.push(vector);
                        metadata.push(ChunkMetadata::new(
                            file.clone(),
                            chunk_id,
                            chunk,
                            path.display().to_string(),
                        ));
                        summary.chunks_embedded += 1;
                    }
                    Err(e) => {
                        warn!("skipping chunk {chunk_id} of {}: {e}", path.display());
                        summary.chunks_failed += 1;
                    }
                }
            }
        }

        if vectors.is_empty() {
            return Err(IngestError::NoEmbeddings {
                documents: summary.documents_loaded,
            });
        }

        let index = FlatIndex::build(vectors, metadata)?;
        summary.dimension = index.dimension();
        index.persist(&self.store_dir)?;

        info!(
            "indexed {} chunk(s) from {} document(s) (dimension {}) into {}",
            summary.chunks_embedded,
            summary.documents_loaded,
            summary.dimension,
            self.store_dir.display()
        );

        Ok(summary)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Tests
// ============================================================================
