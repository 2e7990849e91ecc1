//! Exact cache over the store's key-value surface

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::cache::{CacheEntry, ExactCache};
use crate::domain::store::VectorStore;
use crate::domain::DomainError;

/// Exact-match cache persisting serialized [`CacheEntry`] values under the
/// normalized query key
#[derive(Debug)]
pub struct StoreExactCache {
    store: Arc<dyn VectorStore>,
}

impl StoreExactCache {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExactCache for StoreExactCache {
    async fn lookup(&self, normalized_query: &str) -> Result<Option<String>, DomainError> {
        let raw = self
            .store
            .exact_get(normalized_query)
            .await
            .map_err(|e| DomainError::cache_unavailable(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let mut entry: CacheEntry = serde_json::from_str(&raw).map_err(|e| {
            DomainError::cache_unavailable(format!("corrupt cache entry: {}", e))
        })?;

        // Hit accounting is best-effort; last write wins is fine here.
        entry.increment_hits();
        if let Ok(serialized) = serde_json::to_string(&entry) {
            if let Err(e) = self.store.exact_put(normalized_query, &serialized).await {
                debug!(error = %e, "failed to persist hit count");
            }
        }

        Ok(Some(entry.answer().to_string()))
    }

    async fn update(&self, normalized_query: &str, answer: &str) -> Result<(), DomainError> {
        let entry = CacheEntry::new(normalized_query, answer);
        let serialized = serde_json::to_string(&entry)
            .map_err(|e| DomainError::internal(format!("failed to serialize entry: {}", e)))?;

        self.store
            .exact_put(normalized_query, &serialized)
            .await
            .map_err(|e| DomainError::cache_unavailable(e.to_string()))
    }
}
