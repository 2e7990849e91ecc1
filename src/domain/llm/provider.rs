use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for language model providers (OpenAI, Ollama, etc.)
///
/// The concrete provider, including its model selection, is resolved once at
/// startup; callers only see this capability.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Generate a completion for the given request
    ///
    /// Fails with [`DomainError::GenerationFailed`] on transport or provider
    /// errors.
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
