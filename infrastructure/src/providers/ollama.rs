//! Ollama backend
//!
//! Single-turn `POST {base_url}/api/chat` with streaming disabled.

use super::{http_client, map_request_error};
use crate::config::FileOllamaConfig;
use async_trait::async_trait;
use consensus_application::{Generation, LlmProvider, ProviderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const OLLAMA_PROVIDER: &str = "ollama";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
    eval_count: Option<u64>,
    eval_duration: Option<u64>,
}

impl From<ChatResponse> for Generation {
    fn from(response: ChatResponse) -> Self {
        let mut generation = Generation::new(response.message.content);
        if let Some(count) = response.eval_count {
            generation = generation.with_metadata("eval_count", Value::from(count));
        }
        if let Some(duration) = response.eval_duration {
            generation = generation.with_metadata("eval_duration", Value::from(duration));
        }
        generation
    }
}

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(config: &FileOllamaConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        OLLAMA_PROVIDER
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError> {
        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        debug!(model, prompt_len = prompt.len(), "Calling Ollama chat API");

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Ollama: {}", e)))?;
        Ok(parsed.into())
    }

    /// A local endpoint always has a default; reachability is checked per call.
    fn is_configured(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "llama3.1",
            messages: [ChatMessage {
                role: "user",
                content: "Hi",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hi");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_response_metadata() {
        let body = r#"{
            "model": "llama3.1",
            "message": {"role": "assistant", "content": "Hello!"},
            "done": true,
            "eval_count": 42,
            "eval_duration": 1500000
        }"#;
        let generation: Generation = serde_json::from_str::<ChatResponse>(body).unwrap().into();
        assert_eq!(generation.content, "Hello!");
        assert_eq!(generation.metadata["eval_count"], 42);
        assert_eq!(generation.metadata["eval_duration"], 1500000);
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let config = FileOllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..Default::default()
        };
        let provider = OllamaProvider::new(&config).unwrap();
        assert_eq!(provider.chat_url(), "http://localhost:11434/api/chat");
        assert!(provider.is_configured());
    }
}
