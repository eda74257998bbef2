//! Configuration management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for local development. The config is built once at
//! process start and passed into each component; there is no global state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Ollama endpoint and model configuration
    pub llm: LlmConfig,

    /// Vector store location
    pub store: StoreConfig,

    /// Ingestion configuration
    pub ingest: IngestConfig,

    /// Query-time retrieval configuration
    pub retrieval: RetrievalConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Ollama
        if let Ok(url) = std::env::var("OLLAMA_HOST") {
            config.llm.ollama_url = url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.llm.model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }

        // Paths
        if let Ok(path) = std::env::var("VECTOR_STORE_PATH") {
            config.store.vector_store_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SOURCE_DIR") {
            config.ingest.source_dir = PathBuf::from(path);
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.server.host != ServerConfig::default().host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != ServerConfig::default().port {
            self.server.port = env_config.server.port;
        }
        if env_config.llm.ollama_url != LlmConfig::default().ollama_url {
            self.llm.ollama_url = env_config.llm.ollama_url;
        }
        if env_config.store.vector_store_path != StoreConfig::default().vector_store_path {
            self.store.vector_store_path = env_config.store.vector_store_path;
        }
        if env_config.ingest.source_dir != IngestConfig::default().source_dir {
            self.ingest.source_dir = env_config.ingest.source_dir;
        }

        Ok(self)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Ollama endpoint and model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama server URL
    pub ollama_url: String,

    /// Generation model name
    pub model: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Timeout for query-time embedding and generation calls, in seconds
    pub query_timeout_secs: u64,

    /// Timeout for ingestion-time embedding calls, in seconds.
    /// Longer than the query timeout: embedding models can be slow on
    /// first load and ingestion is a batch job.
    pub ingest_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            query_timeout_secs: 120,
            ingest_timeout_secs: 300,
        }
    }
}

/// Vector store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persisted index pair
    /// (`faiss_index.bin` + `metadata.json`)
    pub vector_store_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            vector_store_path: PathBuf::from("./vector_store"),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Root directory scanned recursively for documents
    pub source_dir: PathBuf,

    /// Target maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters by which consecutive chunks repeat
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./documents"),
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Query-time retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of candidates returned by similarity search
    pub top_k: usize,

    /// Character budget for the assembled context string
    pub max_context_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_context_length: 2000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
