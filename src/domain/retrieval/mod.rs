//! Document retrieval over the vector store

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::store::VectorStore;
use crate::domain::DomainError;

/// A document chunk returned for a query
///
/// Transient: produced per query, never persisted by the core.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub score: f32,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
            score,
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Trait for retrieving the most relevant stored chunks for a query
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    /// Return up to `k` documents ranked by descending similarity
    ///
    /// An empty result is valid (empty store, or nothing crosses the store's
    /// relevance floor) and is not an error.
    async fn retrieve(&self, query: &str, k: usize)
        -> Result<Vec<RetrievedDocument>, DomainError>;
}

/// Retriever that embeds the query and searches the document store
#[derive(Debug)]
pub struct EmbeddingRetriever {
    store: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingRetriever {
    pub fn new(store: Arc<dyn VectorStore>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embeddings }
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let embedding = self.embeddings.embed(query).await?;
        let results = self.store.search(&embedding, k).await?;

        Ok(results
            .into_iter()
            .map(|scored| {
                RetrievedDocument::new(scored.record.content, scored.score)
                    .with_metadata(scored.record.metadata)
            })
            .collect())
    }
}
