//! Scribe application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the backend gateway and the context retriever
//! 4. Start the axum API server

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use scribe_core::config::RetrievalConfig;
use scribe_core::{ScribeConfig, ScribeError};
use scribe_gateway::{BackendTable, HttpGateway};
use scribe_retrieval::passages::load_passages;
use scribe_retrieval::{
    ChromaRetriever, ContextRetriever, EmbeddingService, HttpEmbedding, IndexRetriever,
    MockEmbedding, NoopRetriever,
};
use scribe_router::{IntentRouter, KeywordMatcher, RouterSettings};

use scribe_api::state::AppState;

use crate::cli::CliArgs;

/// Build the store named in the config over the given embedder.
async fn build_store<E>(
    config: &RetrievalConfig,
    embedder: E,
) -> Result<Arc<dyn ContextRetriever>, Box<dyn std::error::Error>>
where
    E: EmbeddingService + 'static,
{
    match config.store.as_str() {
        "memory" => {
            let retriever = IndexRetriever::new(embedder);
            if let Some(ref file) = config.passages_file {
                let passages = load_passages(Path::new(file))?;
                let count = retriever.seed(&passages).await?;
                tracing::info!(path = %file, passages = count, "Passage index seeded");
            } else {
                tracing::warn!("No passages_file configured; in-memory index is empty");
            }
            Ok(Arc::new(retriever))
        }
        "chroma" => {
            tracing::info!(
                url = %config.chroma_url,
                collection = %config.collection,
                "Using Chroma vector store"
            );
            Ok(Arc::new(ChromaRetriever::new(
                config.chroma_url.clone(),
                config.collection.clone(),
                embedder,
                Duration::from_secs(config.timeout_secs),
            )))
        }
        other => Err(ScribeError::Config(format!("unknown retrieval store: {}", other)).into()),
    }
}

async fn build_retriever(
    config: &RetrievalConfig,
) -> Result<Arc<dyn ContextRetriever>, Box<dyn std::error::Error>> {
    if !config.enabled {
        tracing::info!("Context retrieval disabled");
        return Ok(Arc::new(NoopRetriever));
    }

    match config.embedding.as_str() {
        "mock" => build_store(config, MockEmbedding::new()).await,
        "http" => {
            let embedder = HttpEmbedding::new(
                config.embedding_url.clone(),
                Duration::from_secs(config.timeout_secs),
            );
            build_store(config, embedder).await
        }
        other => Err(ScribeError::Config(format!("unknown embedding service: {}", other)).into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. A missing file means defaults; a broken one is fatal.
    let config_file = args.resolve_config_path();
    let file_found = config_file.exists();
    let mut config = if file_found {
        ScribeConfig::load(&config_file)?
    } else {
        ScribeConfig::default()
    };
    args.apply(&mut config);
    config.validate()?;

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));
    if file_found {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::warn!(path = %config_file.display(), "No configuration file, using defaults");
    }

    // Backends.
    let table = Arc::new(BackendTable::from_config(&config.backends));
    for backend in table.iter() {
        tracing::info!(backend = %backend.id, name = %backend.name, url = %backend.url, "Backend registered");
    }
    let gateway = Arc::new(HttpGateway::new(
        Arc::clone(&table),
        Duration::from_secs(config.backends.timeout_secs),
        Duration::from_secs(config.backends.connect_timeout_secs),
    ));

    // Retrieval.
    let retriever = build_retriever(&config.retrieval).await?;

    // Router.
    let keywords = KeywordMatcher::new(&config.keywords)
        .map_err(|e| ScribeError::Config(format!("invalid keyword set: {}", e)))?;
    let router = IntentRouter::new(
        gateway,
        retriever,
        keywords,
        RouterSettings::from_config(&config),
    );

    // === API server ===

    let state = AppState::new(config.clone(), router);
    if let Err(e) = scribe_api::start_server(&config, state).await {
        tracing::error!(error = %e, "API server stopped");
        return Err(e.into());
    }

    Ok(())
}
