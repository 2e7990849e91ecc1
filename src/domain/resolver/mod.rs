//! Query resolution pipeline
//!
//! For each query, in strict order: exact cache, semantic cache, then
//! retrieval-augmented generation with cache population and interaction
//! logging. The tiers are mutually exclusive as the source of the answer.
//! Cache and log failures degrade to logged warnings; retrieval and
//! generation failures propagate.

mod interaction;
mod prompt;

pub use interaction::InteractionRecord;
pub use prompt::build_prompt;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::cache::{normalize_query, ExactCache, SemanticCache};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::metrics::{CacheTier, MetricEvent, MetricsSink};
use crate::domain::retrieval::Retriever;
use crate::domain::store::VectorStore;
use crate::domain::DomainError;

/// Tunables for the resolution pipeline
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Number of context documents to retrieve per query
    pub retrieval_k: usize,
    /// Sampling temperature passed to the language model
    pub temperature: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            retrieval_k: 4,
            temperature: 0.7,
        }
    }
}

/// The outcome of one resolved query
#[derive(Debug, Clone)]
pub struct Resolution {
    pub answer: String,
    pub sources: Vec<String>,
    pub source_metadata: Vec<HashMap<String, serde_json::Value>>,
}

impl Resolution {
    /// A resolution served from a cache tier carries no sources
    fn from_cache(answer: String) -> Self {
        Self {
            answer,
            sources: Vec::new(),
            source_metadata: Vec::new(),
        }
    }
}

/// Orchestrates cache lookups, retrieval, generation, cache population,
/// metrics, and interaction logging for a single query
///
/// All collaborators are injected at construction; there is no ambient
/// global state. Nothing is locked across await points, so any number of
/// resolutions may be in flight concurrently.
#[derive(Debug)]
pub struct QueryResolver {
    exact_cache: Arc<dyn ExactCache>,
    semantic_cache: Arc<dyn SemanticCache>,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn VectorStore>,
    metrics: Arc<dyn MetricsSink>,
    config: ResolverConfig,
}

impl QueryResolver {
    pub fn new(
        exact_cache: Arc<dyn ExactCache>,
        semantic_cache: Arc<dyn SemanticCache>,
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStore>,
        metrics: Arc<dyn MetricsSink>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            exact_cache,
            semantic_cache,
            retriever,
            llm,
            store,
            metrics,
            config,
        }
    }

    /// Resolve a raw query into an answer
    pub async fn resolve(&self, raw_query: &str) -> Result<Resolution, DomainError> {
        let started = Instant::now();
        self.metrics.record(MetricEvent::RequestStarted);

        let normalized = normalize_query(raw_query);
        if normalized.is_empty() {
            return Err(DomainError::validation("Query must not be empty"));
        }

        // Exact tier
        match self.exact_cache.lookup(&normalized).await {
            Ok(Some(answer)) => {
                self.metrics.record(MetricEvent::CacheResult {
                    tier: CacheTier::Exact,
                    hit: true,
                });
                info!(query = %normalized, "exact cache hit");
                self.append_interaction(&normalized, &answer, started, CacheTier::Exact)
                    .await;
                return Ok(Resolution::from_cache(answer));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "exact cache lookup failed; treating as miss");
            }
        }

        // Semantic tier
        match self.semantic_cache.lookup(&normalized).await {
            Ok(Some(hit)) => {
                self.metrics.record(MetricEvent::CacheResult {
                    tier: CacheTier::Semantic,
                    hit: true,
                });
                info!(query = %normalized, similarity = hit.similarity, "semantic cache hit");
                self.append_interaction(&normalized, &hit.answer, started, CacheTier::Semantic)
                    .await;
                return Ok(Resolution::from_cache(hit.answer));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "semantic cache lookup failed; treating as miss");
            }
        }

        // Both tiers missed; generate.
        self.metrics.record(MetricEvent::CacheResult {
            tier: CacheTier::Exact,
            hit: false,
        });
        self.metrics.record(MetricEvent::CacheResult {
            tier: CacheTier::Semantic,
            hit: false,
        });

        let documents = match self
            .retriever
            .retrieve(&normalized, self.config.retrieval_k)
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                self.metrics.record(MetricEvent::Error { kind: e.kind() });
                return Err(e);
            }
        };

        debug!(context_documents = documents.len(), "retrieved context");

        let request = LlmRequest::builder()
            .user(build_prompt(&documents, raw_query))
            .temperature(self.config.temperature)
            .build();

        let generation_started = Instant::now();
        let response = match self.llm.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record(MetricEvent::Error { kind: e.kind() });
                return Err(e);
            }
        };
        self.metrics.record(MetricEvent::GenerationCompleted {
            duration: generation_started.elapsed(),
        });

        let answer = response.content().to_string();

        // Populate both tiers, best-effort. Order does not matter;
        // last-write-wins duplicates are equivalent answers.
        if let Err(e) = self.exact_cache.update(&normalized, &answer).await {
            warn!(error = %e, "exact cache update failed");
        }
        if let Err(e) = self.semantic_cache.update(&normalized, &answer).await {
            warn!(error = %e, "semantic cache update failed");
        }

        self.append_interaction(&normalized, &answer, started, CacheTier::None)
            .await;

        Ok(Resolution {
            answer,
            sources: documents.iter().map(|doc| doc.content.clone()).collect(),
            source_metadata: documents.into_iter().map(|doc| doc.metadata).collect(),
        })
    }

    async fn append_interaction(
        &self,
        query: &str,
        answer: &str,
        started: Instant,
        tier: CacheTier,
    ) {
        let record =
            InteractionRecord::new(query, answer, started.elapsed().as_secs_f64(), tier);

        if let Err(e) = self.store.append_log(&record).await {
            warn!(error = %e, "failed to append interaction record");
        } else {
            debug!(cache_tier = %tier, "stored interaction");
        }
    }
}
