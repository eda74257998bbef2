//! Lore API Server
//!
//! Serves retrieval-grounded chat over the persisted vector index.

use lore_api::{create_router, AppState};
use lore_core::AppConfig;
use lore_rag::{OllamaClient, Retriever};
use lore_vector::OllamaEmbedding;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().unwrap_or_default();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lore={},tower_http=warn", config.logging.level).into()),
        )
        .init();

    // Build components once; the retriever loads the index here and the
    // process serves it read-only from then on
    let embedder = Arc::new(OllamaEmbedding::for_query(&config.llm)?);
    let retriever = Arc::new(Retriever::new(&config.store.vector_store_path, embedder));
    let llm = Arc::new(OllamaClient::from_config(&config.llm)?);

    if !retriever.is_available() {
        tracing::warn!("vector store not found; run `lore ingest` to build one");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, retriever, llm));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("lore API server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
