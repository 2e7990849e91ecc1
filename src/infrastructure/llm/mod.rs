//! LLM provider implementations

mod factory;
mod ollama;
mod openai;

pub use factory::{LlmProviderConfig, LlmProviderFactory};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
