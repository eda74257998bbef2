//! Lore Vector - embedding acquisition and similarity search
//!
//! Provides the embedding client for the Ollama HTTP API and a flat,
//! exact-search vector index persisted as a two-file directory pair
//! (binary index + JSON metadata).

pub mod embedding;
pub mod flat;

pub use embedding::{EmbeddingClient, OllamaEmbedding};
pub use flat::{FlatIndex, INDEX_FILE, METADATA_FILE};
