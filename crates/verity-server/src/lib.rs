//! Verity Server
//!
//! HTTP service in front of the verification pipeline. Loads the fact
//! corpus and the lookup cache at startup, then serves verification,
//! demonstration and health requests.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verity_engine::{RetrievalEngine, Verifier};
use verity_lookup::WikipediaClient;
use verity_store::{Corpus, LexicalEmbeddingModel, LookupCache};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Corpus or cache could not be loaded
    #[error("Storage error: {0}")]
    Store(#[from] verity_store::StoreError),

    /// Pipeline could not be built
    #[error("Engine error: {0}")]
    Engine(#[from] verity_engine::EngineError),

    /// Encyclopedia client could not be built
    #[error("Lookup error: {0}")]
    Lookup(#[from] verity_lookup::LookupError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the shared application state from configuration
///
/// A missing or invalid corpus is fatal. When the external lookup is
/// enabled, its results are cached at `cache_path`.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let corpus = Corpus::load(&config.corpus_path)?;
    info!(records = corpus.len(), path = %config.corpus_path.display(), "Loaded corpus");

    let mut retrieval = RetrievalEngine::new(
        Arc::new(corpus),
        Arc::new(LexicalEmbeddingModel::default()),
        config.engine_config(),
    )?;

    if config.lookup.enabled {
        let client = WikipediaClient::new(
            &config.lookup.endpoint,
            Duration::from_secs(config.lookup.timeout_secs),
        )?
        .with_max_retries(config.lookup.max_retries);

        if let Some(parent) = std::path::Path::new(&config.cache_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let cache = LookupCache::open(
            &config.cache_path,
            config.cache_max_entries,
            Duration::from_secs(config.cache_ttl_secs),
        )?;
        info!(path = %config.cache_path, entries = cache.len()?, "Opened lookup cache");

        retrieval = retrieval.with_lookup(Arc::new(client)).with_cache(Arc::new(cache));
    } else {
        warn!("External lookup disabled; only the corpus will be consulted");
    }

    let verifier = Verifier::new(Arc::new(retrieval), config.scoring.clone())?;
    Ok(AppState {
        verifier: Arc::new(verifier),
    })
}

/// Start the HTTP server
///
/// Initializes tracing, builds the pipeline and serves until the process
/// is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Verity server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        verified = config.scoring.verified_threshold,
        suspected = config.scoring.suspected_threshold,
        "Verdict thresholds"
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bundled_corpus() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/corpus.json"))
    }

    #[test]
    fn test_build_state_from_bundled_corpus() {
        let config = ServerConfig {
            corpus_path: bundled_corpus(),
            ..ServerConfig::default_test_config()
        };
        let state = build_state(&config).unwrap();
        let health = state.verifier.health();
        assert!(health.corpus_record_count > 0);
        assert!(!health.external_lookup);
    }

    #[test]
    fn test_missing_corpus_is_fatal() {
        let config = ServerConfig {
            corpus_path: PathBuf::from("/nonexistent/corpus.json"),
            ..ServerConfig::default_test_config()
        };
        assert!(matches!(build_state(&config), Err(ServerError::Store(_))));
    }
}
