use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use respi_core::VectorStore;
use respi_gemini::GeminiClient;
use respi_rag::{DocumentIngestor, IdStrategy, IngestOptions, PineconeVectorStore};
use respi_server::{AppState, ServiceConfig};

#[derive(Parser)]
#[command(name = "respi-guard")]
#[command(about = "Respiratory-health advisories grounded in medical guidelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the advisory HTTP service
    Serve {
        /// Address to listen on (defaults to RESPI_BIND or 127.0.0.1:5000)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the JSON guideline folder into the vector index
    Ingest {
        /// Folder of *.json documents (defaults to RESPI_DOCS_FOLDER or medical_docs)
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Derive vector IDs from content so re-runs overwrite instead of duplicating
        #[arg(long)]
        dedupe: bool,
        /// Slices embedded and upserted per request
        #[arg(long, default_value_t = 32)]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServiceConfig::from_env();
    respi_server::logging::init();
    config.warn_missing_keys();

    match cli.command {
        Commands::Serve { bind } => serve(config, bind).await,
        Commands::Ingest {
            folder,
            dedupe,
            batch_size,
        } => ingest(config, folder, dedupe, batch_size).await,
    }
}

async fn serve(config: ServiceConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.bind.clone());

    let state = AppState::from_config(&config)
        .await
        .context("Failed to initialize service clients")?;

    println!("{} Respi-Guard serving on {}", "🫁".green(), bind.bold());
    respi_server::serve(state, &bind)
        .await
        .with_context(|| format!("Server on {} stopped", bind))
}

async fn ingest(
    config: ServiceConfig,
    folder: Option<PathBuf>,
    dedupe: bool,
    batch_size: usize,
) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.docs_folder.clone());
    println!("{} Starting structured JSON ingestion from {}", "🚀".blue(), folder.display());

    let embedder = Arc::new(
        GeminiClient::new(config.gemini.clone()).context("Failed to build Gemini client")?,
    );

    let mut index =
        PineconeVectorStore::new(config.pinecone.clone()).context("Failed to build Pinecone client")?;
    index
        .connect()
        .await
        .with_context(|| format!("Failed to connect to index '{}'", config.pinecone.index_name))?;

    let options = IngestOptions {
        batch_size,
        id_strategy: if dedupe {
            IdStrategy::ContentHash
        } else {
            IdStrategy::Random
        },
        ..Default::default()
    };

    println!("{} Syncing with Pinecone...", "⏳".yellow());
    let report = DocumentIngestor::with_options(embedder, Arc::new(index), options)
        .ingest_folder(&folder)
        .await
        .with_context(|| format!("Ingestion of {} failed", folder.display()))?;

    println!(
        "{} Created {} medical context slices from {} files",
        "📄".cyan(),
        report.slices,
        report.files
    );
    for (doc_type, count) in &report.by_doc_type {
        println!("  {} {}: {}", "•".cyan(), doc_type, count);
    }
    println!(
        "{} Upserted {} vectors into '{}'",
        "✅".green(),
        report.upserted.to_string().bold(),
        config.pinecone.index_name
    );

    Ok(())
}
