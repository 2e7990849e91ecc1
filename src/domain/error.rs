use thiserror::Error;

/// Core domain errors
///
/// Cache-tier failures are non-fatal by policy: the resolver treats them as
/// misses. Generation and retrieval failures propagate to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    #[error("Embedding service unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        Self::CacheUnavailable {
            message: message.into(),
        }
    }

    pub fn embedding_unavailable(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable kind label, reused by error metric events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CacheUnavailable { .. } => "cache_unavailable",
            Self::EmbeddingUnavailable { .. } => "embedding_unavailable",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_error() {
        let error = DomainError::generation_failed("model endpoint unreachable");
        assert_eq!(
            error.to_string(),
            "Generation failed: model endpoint unreachable"
        );
        assert_eq!(error.kind(), "generation_failed");
    }

    #[test]
    fn test_cache_unavailable_error() {
        let error = DomainError::cache_unavailable("connection refused");
        assert_eq!(error.to_string(), "Cache unavailable: connection refused");
        assert_eq!(error.kind(), "cache_unavailable");
    }

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(
            DomainError::embedding_unavailable("x").kind(),
            "embedding_unavailable"
        );
        assert_eq!(DomainError::store_unavailable("x").kind(), "store_unavailable");
        assert_eq!(DomainError::validation("x").kind(), "validation");
    }
}
