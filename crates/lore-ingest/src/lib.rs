//! Lore Ingest - the one-shot ingestion pipeline
//!
//! Discovers documents under a source directory, splits them into
//! overlapping boundary-aware chunks, embeds each chunk, and builds and
//! persists the vector index. Failures are isolated to the smallest
//! affected unit: an unreadable document or a failed embedding is logged
//! and skipped, never fatal to the run.

pub mod chunker;
pub mod document;
pub mod pipeline;

pub use chunker::chunk_text;
pub use document::{discover_documents, load_document, FileType};
pub use pipeline::{IngestError, IngestPipeline, IngestSummary};
