//! Lore Core - shared types, errors, and configuration
//!
//! This crate defines the abstractions used throughout the lore assistant:
//! - Common error types for the retrieval pipeline
//! - Chunk metadata and search result models
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, IngestConfig, LlmConfig, LoggingConfig, RetrievalConfig, ServerConfig,
    StoreConfig,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for lore operations
#[derive(Error, Debug)]
pub enum LoreError {
    /// Vectors handed to the index do not share one length
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector and metadata counts differ at index construction
    #[error("count mismatch: {vectors} vectors but {metadata} metadata records")]
    CountMismatch { vectors: usize, metadata: usize },

    /// Remote embedding call failed (transport error or non-success status)
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Persisted index artifacts are missing or unreadable
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// Writing the index pair to disk failed
    #[error("failed to persist index: {0}")]
    Persist(String),

    /// A source document could not be read
    #[error("failed to read document {path}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generation/chat call to the language model failed
    #[error("llm error: {0}")]
    Llm(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LoreError>;

// ============================================================================
// Chunk Metadata
// ============================================================================

/// Metadata describing one indexed chunk.
///
/// Records are stored positionally parallel to the index vectors: the record
/// at position `i` describes the vector at position `i`. Field names are part
/// of the persisted `metadata.json` shape and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source file name
    pub file: String,

    /// Zero-based chunk sequence within the source document
    pub chunk_id: usize,

    /// Chunk text
    pub content: String,

    /// Full path of the source file
    pub file_path: String,
}

impl ChunkMetadata {
    /// Create metadata for one chunk of a document
    pub fn new(
        file: impl Into<String>,
        chunk_id: usize,
        content: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            chunk_id,
            content: content.into(),
            file_path: file_path.into(),
        }
    }
}

// ============================================================================
// Search Results
// ============================================================================

/// A chunk returned from similarity search, with its score.
///
/// Scores are raw inner products: unbounded, higher is more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub metadata: ChunkMetadata,

    /// Inner-product similarity against the query vector
    pub score: f32,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_metadata_json_shape() {
        let meta = ChunkMetadata::new("notes.md", 2, "some text", "/docs/notes.md");
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["file"], "notes.md");
        assert_eq!(json["chunk_id"], 2);
        assert_eq!(json["content"], "some text");
        assert_eq!(json["file_path"], "/docs/notes.md");
    }

    #[test]
    fn scored_chunk_flattens_metadata() {
        let result = ScoredChunk {
            metadata: ChunkMetadata::new("a.txt", 0, "text", "/a.txt"),
            score: 0.5,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["file"], "a.txt");
        assert!((json["score"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn error_messages_name_the_counts() {
        let err = LoreError::CountMismatch {
            vectors: 3,
            metadata: 2,
        };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('2'));
    }
}
