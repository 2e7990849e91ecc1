//! Vector store trait
//!
//! One narrow interface over the persistence backend: a vector surface for
//! similarity search, a key-value surface for the exact cache, and an
//! append-only interaction log. Each instance is bound to a single vector
//! namespace; the document store and the semantic cache hold separate
//! handles.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::resolver::InteractionRecord;
use crate::domain::DomainError;

/// Payload persisted next to an embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_all_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A record returned by similarity search, with its score
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: VectorRecord,
    pub score: f32,
}

impl ScoredRecord {
    pub fn new(record: VectorRecord, score: f32) -> Self {
        Self { record, score }
    }
}

/// Trait for the persistence backend
///
/// All operations fail with [`DomainError::StoreUnavailable`] when the
/// backend cannot be reached.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Insert or replace a record with its embedding
    async fn put(&self, record: VectorRecord, embedding: Vec<f32>) -> Result<(), DomainError>;

    /// Nearest-neighbor search, ordered by descending score, at most `k` results
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredRecord>, DomainError>;

    /// Read a value from the key-value surface
    async fn exact_get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a value to the key-value surface (last write wins)
    async fn exact_put(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Append one record to the interaction log
    async fn append_log(&self, record: &InteractionRecord) -> Result<(), DomainError>;

    /// Ensure backing tables exist
    async fn ensure_schema(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::cosine_similarity;
    use std::sync::Mutex;

    /// Mock store with per-surface state and a global failure switch
    #[derive(Debug, Default)]
    pub struct MockVectorStore {
        vectors: Mutex<Vec<(VectorRecord, Vec<f32>)>>,
        kv: Mutex<HashMap<String, String>>,
        log: Mutex<Vec<InteractionRecord>>,
        fail: Mutex<bool>,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let store = Self::default();
            *store.fail.lock().unwrap() = true;
            store
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        pub fn logged(&self) -> Vec<InteractionRecord> {
            self.log.lock().unwrap().clone()
        }

        pub fn kv_len(&self) -> usize {
            self.kv.lock().unwrap().len()
        }

        pub fn vector_len(&self) -> usize {
            self.vectors.lock().unwrap().len()
        }

        fn check(&self) -> Result<(), DomainError> {
            if *self.fail.lock().unwrap() {
                return Err(DomainError::store_unavailable("mock store offline"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl VectorStore for MockVectorStore {
        async fn put(&self, record: VectorRecord, embedding: Vec<f32>) -> Result<(), DomainError> {
            self.check()?;
            let mut vectors = self.vectors.lock().unwrap();
            vectors.retain(|(r, _)| r.id != record.id);
            vectors.push((record, embedding));
            Ok(())
        }

        async fn search(
            &self,
            embedding: &[f32],
            k: usize,
        ) -> Result<Vec<ScoredRecord>, DomainError> {
            self.check()?;
            let vectors = self.vectors.lock().unwrap();

            let mut results: Vec<ScoredRecord> = vectors
                .iter()
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
            self.check()?;
            Ok(self.kv.lock().unwrap().get(key).cloned())
        }

        async fn exact_put(&self, key: &str, value: &str) -> Result<(), DomainError> {
            self.check()?;
            self.kv
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn append_log(&self, record: &InteractionRecord) -> Result<(), DomainError> {
            self.check()?;
            self.log.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn ensure_schema(&self) -> Result<(), DomainError> {
            self.check()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_put_is_idempotent_per_id() {
            let store = MockVectorStore::new();
            let record = VectorRecord::new("r1", "first");

            store.put(record.clone(), vec![1.0, 0.0]).await.unwrap();
            store
                .put(VectorRecord::new("r1", "second"), vec![1.0, 0.0])
                .await
                .unwrap();

            assert_eq!(store.vector_len(), 1);
        }

        #[tokio::test]
        async fn test_search_orders_by_score() {
            let store = MockVectorStore::new();
            store
                .put(VectorRecord::new("far", "far"), vec![0.0, 1.0])
                .await
                .unwrap();
            store
                .put(VectorRecord::new("near", "near"), vec![1.0, 0.1])
                .await
                .unwrap();

            let results = store.search(&[1.0, 0.0], 2).await.unwrap();

            assert_eq!(results[0].record.id, "near");
            assert!(results[0].score >= results[1].score);
        }

        #[tokio::test]
        async fn test_failing_store() {
            let store = MockVectorStore::failing();

            let result = store.exact_get("key").await;
            assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
        }
    }
}
