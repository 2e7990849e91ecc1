//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding for a single text
    ///
    /// Fails with [`DomainError::EmbeddingUnavailable`] on transport error.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Generate embeddings for a batch of texts, one vector per input
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Deterministic mock: the embedding is a function of the text's bytes,
    /// so identical texts always embed identically.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
            (0..self.dimensions)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::embedding_unavailable(error));
            }

            Ok(self.vector_for(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::embedding_unavailable(error));
            }

            Ok(texts.iter().map(|t| self.vector_for(t)).collect())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new(128);

            let first = provider.embed("Hello").await.unwrap();
            let second = provider.embed("Hello").await.unwrap();

            assert_eq!(first, second);
            assert_eq!(first.len(), 128);
        }

        #[tokio::test]
        async fn test_batch_matches_single() {
            let provider = MockEmbeddingProvider::new(64);

            let single = provider.embed("a").await.unwrap();
            let batch = provider
                .embed_batch(&["a".to_string(), "b".to_string()])
                .await
                .unwrap();

            assert_eq!(batch.len(), 2);
            assert_eq!(batch[0], single);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new(128).with_error("endpoint down");

            let result = provider.embed("Hello").await;

            assert!(matches!(
                result,
                Err(DomainError::EmbeddingUnavailable { .. })
            ));
        }
    }
}
