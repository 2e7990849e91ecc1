use serde::Deserialize;
use std::sync::Arc;

use super::{OllamaProvider, OpenAiProvider};
use crate::domain::llm::LlmProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;

/// LLM provider selection
///
/// Tagged so that an unrecognized `type` fails configuration loading at
/// startup instead of silently falling back to another provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LlmProviderConfig {
    OpenAi {
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_base_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self::Ollama {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

/// Factory resolving the configured provider once at startup
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn create(
        config: &LlmProviderConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        match config {
            LlmProviderConfig::OpenAi {
                model,
                api_key,
                base_url,
            } => {
                let api_key = api_key
                    .clone()
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "OpenAI provider selected but no API key configured \
                             (set llm.api_key or OPENAI_API_KEY)",
                        )
                    })?;

                let provider = match base_url {
                    Some(url) => OpenAiProvider::with_base_url(client, api_key, model, url),
                    None => OpenAiProvider::new(client, api_key, model),
                };

                Ok(Arc::new(provider))
            }

            LlmProviderConfig::Ollama { base_url, model } => {
                Ok(Arc::new(OllamaProvider::new(client, base_url, model)))
            }
        }
    }
}
