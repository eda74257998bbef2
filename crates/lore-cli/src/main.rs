//! Lore CLI
//!
//! Usage:
//!   lore ingest [--source <dir>]
//!   lore search <query> [--top-k <n>]
//!   lore ask <question>

use anyhow::bail;
use clap::{Parser, Subcommand};
use lore_core::AppConfig;
use lore_ingest::{IngestError, IngestPipeline};
use lore_rag::{rag_prompt, LlmClient, OllamaClient, Retriever};
use lore_vector::OllamaEmbedding;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lore")]
#[command(about = "Personal document assistant")]
#[command(version)]
struct Cli {
    /// TOML config file; environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest documents and build the vector index
    Ingest {
        /// Source directory, overriding the configured one
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Search the indexed corpus
    Search {
        /// Query text
        query: String,

        /// Number of results
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Ask a question grounded in the indexed corpus
    Ask {
        /// Question to ask
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lore=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { source } => ingest(&config, source).await,
        Commands::Search { query, top_k } => search(&config, &query, top_k).await,
        Commands::Ask { question } => ask(&config, &question).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn ingest(config: &AppConfig, source: Option<PathBuf>) -> anyhow::Result<()> {
    let embedder = OllamaEmbedding::for_ingest(&config.llm)?;
    let mut pipeline = IngestPipeline::new(&config.ingest, &config.store);
    if let Some(dir) = source {
        pipeline = pipeline.with_source_dir(dir);
    }

    match pipeline.run(&embedder).await {
        Ok(summary) => {
            println!(
                "Indexed {} chunk(s) from {} of {} document(s) into {}",
                summary.chunks_embedded,
                summary.documents_loaded,
                summary.documents_found,
                config.store.vector_store_path.display()
            );
            if summary.chunks_failed > 0 {
                println!(
                    "Warning: {} chunk(s) failed to embed and were skipped",
                    summary.chunks_failed
                );
            }
            Ok(())
        }
        Err(IngestError::NoDocuments(path)) => {
            bail!(
                "no documents found under {} - add .md/.txt/.json/.py files or pass --source",
                path.display()
            )
        }
        Err(IngestError::NoEmbeddings { documents }) => {
            bail!(
                "read {documents} document(s) but no embeddings were generated - \
                 is Ollama running at {}?",
                config.llm.ollama_url
            )
        }
        Err(IngestError::Index(e)) => Err(e.into()),
    }
}

async fn search(config: &AppConfig, query: &str, top_k: Option<usize>) -> anyhow::Result<()> {
    let embedder = Arc::new(OllamaEmbedding::for_query(&config.llm)?);
    let retriever = Retriever::new(&config.store.vector_store_path, embedder);

    if !retriever.is_available() {
        println!("No index found. Run `lore ingest` first.");
        return Ok(());
    }

    let top_k = top_k.unwrap_or(config.retrieval.top_k);
    let results = retriever.search_documents(query, top_k).await;

    if results.is_empty() {
        println!("No matching chunks.");
        return Ok(());
    }

    for result in results {
        let snippet: String = result.metadata.content.chars().take(100).collect();
        println!(
            "{:>8.3}  {} #{}",
            result.score, result.metadata.file, result.metadata.chunk_id
        );
        println!("          {snippet}");
    }

    Ok(())
}

async fn ask(config: &AppConfig, question: &str) -> anyhow::Result<()> {
    let embedder = Arc::new(OllamaEmbedding::for_query(&config.llm)?);
    let retriever = Retriever::new(&config.store.vector_store_path, embedder);

    let context = retriever
        .get_context_for_query(question, config.retrieval.max_context_length)
        .await;
    if context.is_empty() {
        eprintln!("(answering without document context)");
    }

    let llm = OllamaClient::from_config(&config.llm)?;
    let answer = llm.generate(&rag_prompt(question, &context)).await?;
    println!("{answer}");

    Ok(())
}
