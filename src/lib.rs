//! Knowledge Assistant
//!
//! Answers natural-language questions over an ingested document store with:
//! - Two cache tiers (exact match and embedding similarity) in front of
//!   retrieval-augmented generation
//! - Pluggable LLM providers (OpenAI, Ollama) resolved once at startup
//! - CrateDB or in-memory persistence for documents, caches, and the
//!   interaction log

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::AppState;
use config::StoreBackend;
use domain::cache::SemanticCacheConfig;
use domain::embedding::EmbeddingProvider;
use domain::metrics::MetricsSink;
use domain::retrieval::EmbeddingRetriever;
use domain::store::VectorStore;
use domain::{QueryResolver, ResolverConfig};
use infrastructure::cache::{StoreExactCache, StoreSemanticCache};
use infrastructure::embedding::TextEmbeddingsProvider;
use infrastructure::http_client::HttpClient;
use infrastructure::ingestion::{IngestionService, RecursiveChunker};
use infrastructure::llm::LlmProviderFactory;
use infrastructure::observability::PrometheusMetricsSink;
use infrastructure::store::{CrateDbTables, CrateDbVectorStore, InMemoryVectorStore};

/// Create the application state with all services wired up
///
/// Every collaborator is constructed here and injected explicitly; nothing
/// relies on process-wide defaults.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let http_client = HttpClient::new();

    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(TextEmbeddingsProvider::new(
        http_client.clone(),
        &config.embeddings.endpoint,
    ));

    let llm = LlmProviderFactory::create(&config.llm.provider, http_client.clone())?;
    info!("LLM provider: {}", llm.provider_name());

    let (documents_store, semantic_store) = create_stores(config, &http_client);
    info!("Store backend: {:?}", config.store.backend);

    // Best-effort: a store that is down at boot comes up degraded and the
    // caches fail open.
    for store in [&documents_store, &semantic_store] {
        if let Err(e) = store.ensure_schema().await {
            warn!(error = %e, "failed to ensure store schema");
        }
    }

    let exact_cache = Arc::new(StoreExactCache::new(documents_store.clone()));
    let semantic_cache = Arc::new(StoreSemanticCache::new(
        semantic_store,
        embeddings.clone(),
        SemanticCacheConfig::new(config.cache.semantic_threshold),
    ));
    let retriever = Arc::new(EmbeddingRetriever::new(
        documents_store.clone(),
        embeddings.clone(),
    ));
    let metrics: Arc<dyn MetricsSink> = Arc::new(PrometheusMetricsSink::new());

    let resolver = Arc::new(QueryResolver::new(
        exact_cache,
        semantic_cache,
        retriever,
        llm,
        documents_store.clone(),
        metrics,
        ResolverConfig {
            retrieval_k: config.retrieval.top_k,
            temperature: config.llm.temperature,
        },
    ));

    let ingestion = Arc::new(IngestionService::new(
        documents_store.clone(),
        embeddings,
        Arc::new(RecursiveChunker::new()),
        config.chunking.clone(),
    ));

    Ok(AppState::new(resolver, ingestion, documents_store))
}

fn create_stores(
    config: &AppConfig,
    http_client: &HttpClient,
) -> (Arc<dyn VectorStore>, Arc<dyn VectorStore>) {
    match config.store.backend {
        StoreBackend::Memory => (
            Arc::new(InMemoryVectorStore::new()),
            Arc::new(InMemoryVectorStore::new()),
        ),
        StoreBackend::Cratedb => {
            let documents_tables = CrateDbTables::new(
                &config.store.documents_table,
                &config.store.cache_table,
                &config.store.interactions_table,
            );
            let semantic_tables = CrateDbTables::new(
                &config.store.semantic_cache_table,
                &config.store.cache_table,
                &config.store.interactions_table,
            );

            (
                Arc::new(CrateDbVectorStore::new(
                    http_client.clone(),
                    &config.store.url,
                    documents_tables,
                    config.embeddings.dimensions,
                )),
                Arc::new(CrateDbVectorStore::new(
                    http_client.clone(),
                    &config.store.url,
                    semantic_tables,
                    config.embeddings.dimensions,
                )),
            )
        }
    }
}
