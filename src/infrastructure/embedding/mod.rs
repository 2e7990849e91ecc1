//! Embedding provider implementations

mod text_embeddings;

pub use text_embeddings::TextEmbeddingsProvider;
