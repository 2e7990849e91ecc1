//! HTTP embedding provider for a sentence-transformers style service
//!
//! Speaks the text-embeddings-inference protocol: `POST /embed` with
//! `{"inputs": [...]}` returning one vector per input.

use async_trait::async_trait;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Embedding provider backed by a remote text-embeddings endpoint
#[derive(Debug)]
pub struct TextEmbeddingsProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> TextEmbeddingsProvider<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn embed_url(&self) -> String {
        format!("{}/embed", self.base_url)
    }

    async fn request_embeddings(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        let body = serde_json::json!({ "inputs": inputs });

        let response = self
            .client
            .post_json(
                &self.embed_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await
            .map_err(|e| DomainError::embedding_unavailable(e.to_string()))?;

        let vectors: Vec<Vec<f32>> = serde_json::from_value(response).map_err(|e| {
            DomainError::embedding_unavailable(format!("failed to parse embeddings: {}", e))
        })?;

        if vectors.len() != inputs.len() {
            return Err(DomainError::embedding_unavailable(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for TextEmbeddingsProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.request_embeddings(&[text]).await?;

        vectors
            .pop()
            .ok_or_else(|| DomainError::embedding_unavailable("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
        self.request_embeddings(&inputs).await
    }

    fn provider_name(&self) -> &'static str {
        "text-embeddings"
    }
}
