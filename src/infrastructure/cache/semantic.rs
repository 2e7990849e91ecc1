//! Semantic cache over the store's vector surface

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::cache::{SemanticCache, SemanticCacheConfig, SemanticHit};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::store::{VectorRecord, VectorStore};
use crate::domain::DomainError;

const ANSWER_KEY: &str = "answer";
const CREATED_AT_KEY: &str = "created_at";

/// Similarity-matched cache of previously answered queries
///
/// Each entry is a vector record: the query embedding in the vector column,
/// the query text as content, and the answer in the record metadata.
#[derive(Debug)]
pub struct StoreSemanticCache {
    store: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
}

impl StoreSemanticCache {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            config,
        }
    }
}

#[async_trait]
impl SemanticCache for StoreSemanticCache {
    async fn lookup(&self, query: &str) -> Result<Option<SemanticHit>, DomainError> {
        let embedding = self.embeddings.embed(query).await?;

        let results = self
            .store
            .search(&embedding, self.config.candidates.max(1))
            .await
            .map_err(|e| DomainError::cache_unavailable(e.to_string()))?;

        // Results are ordered by descending similarity; the first entry at
        // or above the threshold wins.
        let hit = results
            .into_iter()
            .find(|scored| scored.score >= self.config.score_threshold)
            .and_then(|scored| {
                scored
                    .record
                    .metadata
                    .get(ANSWER_KEY)
                    .and_then(|answer| answer.as_str())
                    .map(|answer| SemanticHit::new(answer, scored.score))
            });

        Ok(hit)
    }

    async fn update(&self, query: &str, answer: &str) -> Result<(), DomainError> {
        let embedding = self.embeddings.embed(query).await?;

        let record = VectorRecord::new(Uuid::new_v4().to_string(), query)
            .with_metadata(ANSWER_KEY, serde_json::json!(answer))
            .with_metadata(
                CREATED_AT_KEY,
                serde_json::json!(chrono::Utc::now().to_rfc3339()),
            );

        self.store
            .put(record, embedding)
            .await
            .map_err(|e| DomainError::cache_unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::mock::MockEmbeddingProvider;
    use crate::domain::store::mock::MockVectorStore;

    fn cache_with(
        store: Arc<MockVectorStore>,
        threshold: f32,
    ) -> StoreSemanticCache {
        StoreSemanticCache::new(
            store,
            Arc::new(MockEmbeddingProvider::new(32)),
            SemanticCacheConfig::new(threshold),
        )
    }

    #[tokio::test]
    async fn test_identical_query_hits() {
        let store = Arc::new(MockVectorStore::new());
        let cache = cache_with(store, 0.8);

        cache
            .update("what is cratedb?", "A distributed SQL database.")
            .await
            .unwrap();

        let hit = cache.lookup("what is cratedb?").await.unwrap().unwrap();

        assert_eq!(hit.answer, "A distributed SQL database.");
        assert!(hit.similarity > 0.99);
    }

    #[tokio::test]
    async fn test_below_threshold_misses() {
        let store = Arc::new(MockVectorStore::new());
        // Threshold of 1.0 cannot be met by a different query text.
        let cache = cache_with(store, 1.0);

        cache.update("completely different", "answer").await.unwrap();

        let hit = cache.lookup("what is cratedb").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let store = Arc::new(MockVectorStore::new());
        let cache = cache_with(store, 0.8);

        let hit = cache.lookup("anything").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_updates_do_not_corrupt_lookup() {
        let store = Arc::new(MockVectorStore::new());
        let cache = cache_with(store.clone(), 0.8);

        cache.update("what is x?", "x is y").await.unwrap();
        cache.update("what is x?", "x is y").await.unwrap();

        // Two candidate entries, one visible answer.
        assert_eq!(store.vector_len(), 2);
        let hit = cache.lookup("what is x?").await.unwrap().unwrap();
        assert_eq!(hit.answer, "x is y");
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_cache_unavailable() {
        let store = Arc::new(MockVectorStore::failing());
        let cache = cache_with(store, 0.8);

        let result = cache.lookup("query").await;
        assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_as_embedding_unavailable() {
        let store = Arc::new(MockVectorStore::new());
        let cache = StoreSemanticCache::new(
            store,
            Arc::new(MockEmbeddingProvider::new(32).with_error("down")),
            SemanticCacheConfig::default(),
        );

        let result = cache.lookup("query").await;
        assert!(matches!(
            result,
            Err(DomainError::EmbeddingUnavailable { .. })
        ));
    }
}
