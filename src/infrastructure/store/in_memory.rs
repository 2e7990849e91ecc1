//! In-memory vector store
//!
//! Suitable for development and tests; state is lost on restart. Locks are
//! held only for short synchronous sections, never across await points.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::embedding::cosine_similarity;
use crate::domain::resolver::InteractionRecord;
use crate::domain::store::{ScoredRecord, VectorRecord, VectorStore};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    vectors: RwLock<HashMap<String, (VectorRecord, Vec<f32>)>>,
    kv: RwLock<HashMap<String, String>>,
    log: RwLock<Vec<InteractionRecord>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interaction records appended so far
    pub fn log_len(&self) -> usize {
        self.log.read().map(|log| log.len()).unwrap_or(0)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn put(&self, record: VectorRecord, embedding: Vec<f32>) -> Result<(), DomainError> {
        let mut vectors = self
            .vectors
            .write()
            .map_err(|e| DomainError::internal(format!("lock poisoned: {}", e)))?;

        vectors.insert(record.id.clone(), (record, embedding));
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredRecord>, DomainError> {
        let vectors = self
            .vectors
            .read()
            .map_err(|e| DomainError::internal(format!("lock poisoned: {}", e)))?;

        let mut results: Vec<ScoredRecord> = vectors
            .values()
            .map(|(record, stored)| {
                ScoredRecord::new(record.clone(), cosine_similarity(embedding, stored))
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    async fn exact_get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let kv = self
            .kv
            .read()
            .map_err(|e| DomainError::internal(format!("lock poisoned: {}", e)))?;

        Ok(kv.get(key).cloned())
    }

    async fn exact_put(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut kv = self
            .kv
            .write()
            .map_err(|e| DomainError::internal(format!("lock poisoned: {}", e)))?;

        kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn append_log(&self, record: &InteractionRecord) -> Result<(), DomainError> {
        let mut log = self
            .log
            .write()
            .map_err(|e| DomainError::internal(format!("lock poisoned: {}", e)))?;

        log.push(record.clone());
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::CacheTier;

    #[tokio::test]
    async fn test_put_and_search() {
        let store = InMemoryVectorStore::new();

        store
            .put(VectorRecord::new("a", "matching"), vec![1.0, 0.0])
            .await
            .unwrap();
        store
            .put(VectorRecord::new("b", "orthogonal"), vec![0.0, 1.0])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "a");
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_id() {
        let store = InMemoryVectorStore::new();

        store
            .put(VectorRecord::new("a", "first"), vec![1.0])
            .await
            .unwrap();
        store
            .put(VectorRecord::new("a", "second"), vec![1.0])
            .await
            .unwrap();

        let results = store.search(&[1.0], 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.content, "second");
    }

    #[tokio::test]
    async fn test_search_limits_to_k() {
        let store = InMemoryVectorStore::new();

        for i in 0..5 {
            store
                .put(VectorRecord::new(format!("id-{}", i), "content"), vec![1.0])
                .await
                .unwrap();
        }

        let results = store.search(&[1.0], 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_exact_surface_overwrites() {
        let store = InMemoryVectorStore::new();

        store.exact_put("key", "first").await.unwrap();
        store.exact_put("key", "second").await.unwrap();

        let value = store.exact_get("key").await.unwrap();
        assert_eq!(value, Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_exact_get_missing_key() {
        let store = InMemoryVectorStore::new();

        let value = store.exact_get("missing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_append_log() {
        let store = InMemoryVectorStore::new();

        let record = InteractionRecord::new("q", "a", 0.1, CacheTier::None);
        store.append_log(&record).await.unwrap();
        store.append_log(&record).await.unwrap();

        assert_eq!(store.log_len(), 2);
    }
}
