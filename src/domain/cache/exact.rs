//! Exact cache trait and query normalization

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Normalize a raw query for use as an exact-cache key
///
/// Lowercases, trims, and collapses internal whitespace so that trivially
/// reformatted queries share a key.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cache keyed by literal normalized query text
///
/// Deterministic string equality on the key: no false positives, no false
/// negatives. `update` overwrites rather than duplicates.
#[async_trait]
pub trait ExactCache: Send + Sync + Debug {
    /// Look up a previously cached answer
    async fn lookup(&self, normalized_query: &str) -> Result<Option<String>, DomainError>;

    /// Store an answer under the normalized key
    async fn update(&self, normalized_query: &str, answer: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MockExactCache {
        entries: Mutex<HashMap<String, String>>,
        fail: bool,
    }

    impl MockExactCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                fail: true,
            }
        }

        pub fn with_entry(self, key: &str, answer: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), answer.to_string());
            self
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ExactCache for MockExactCache {
        async fn lookup(&self, normalized_query: &str) -> Result<Option<String>, DomainError> {
            if self.fail {
                return Err(DomainError::cache_unavailable("mock cache offline"));
            }
            Ok(self.entries.lock().unwrap().get(normalized_query).cloned())
        }

        async fn update(&self, normalized_query: &str, answer: &str) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::cache_unavailable("mock cache offline"));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(normalized_query.to_string(), answer.to_string());
            Ok(())
        }
    }
}
