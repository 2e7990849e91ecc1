use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Ollama chat provider for locally hosted models
#[derive(Debug)]
pub struct OllamaProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OllamaProvider<C> {
    pub fn new(client: C, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request(&self, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": role_name(m.role),
                    "content": m.content(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        if let Some(temp) = request.temperature {
            body["options"] = serde_json::json!({ "temperature": temp });
        }

        body
    }
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OllamaProvider<C> {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, vec![("Content-Type", "application/json")], &body)
            .await
            .map_err(|e| DomainError::generation_failed(format!("ollama: {}", e)))?;

        let response: OllamaChatResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::generation_failed(format!("ollama: failed to parse response: {}", e))
        })?;

        Ok(LlmResponse::new(
            response.model,
            Message::assistant(response.message.content),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

// Ollama API response types

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "http://localhost:11434/api/chat";

    #[tokio::test]
    async fn test_ollama_generate() {
        let mock_response = serde_json::json!({
            "model": "llama2",
            "message": { "role": "assistant", "content": "Hello from llama!" },
            "done": true
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = OllamaProvider::new(client, "http://localhost:11434", "llama2");

        let response = provider
            .generate(LlmRequest::builder().user("Hello!").build())
            .await
            .unwrap();

        assert_eq!(response.model, "llama2");
        assert_eq!(response.content(), "Hello from llama!");
    }

    #[tokio::test]
    async fn test_ollama_disables_streaming() {
        let mock_response = serde_json::json!({
            "model": "llama2",
            "message": { "content": "ok" }
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = OllamaProvider::new(client, "http://localhost:11434/", "llama2");

        provider
            .generate(LlmRequest::builder().user("Hi").temperature(0.5).build())
            .await
            .unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests[0].0, TEST_URL);
        assert_eq!(requests[0].1["stream"], false);
        assert_eq!(requests[0].1["options"]["temperature"], 0.5);
    }

    #[tokio::test]
    async fn test_ollama_transport_error_is_generation_failure() {
        let client = MockHttpClient::new().with_error(TEST_URL, "connection refused");
        let provider = OllamaProvider::new(client, "http://localhost:11434", "llama2");

        let result = provider
            .generate(LlmRequest::builder().user("Hello!").build())
            .await;

        assert!(matches!(result, Err(DomainError::GenerationFailed { .. })));
    }
}
