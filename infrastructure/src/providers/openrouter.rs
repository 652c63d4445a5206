//! OpenRouter backend
//!
//! OpenAI-compatible chat completions with a bearer key.

use super::{http_client, map_request_error};
use crate::config::FileOpenRouterConfig;
use async_trait::async_trait;
use consensus_application::{Generation, LlmProvider, ProviderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const OPENROUTER_PROVIDER: &str = "openrouter";

const REFERER: &str = "https://github.com/music-brain88/llm-consensus";
const TITLE: &str = "llm-consensus";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Value>,
    error: Option<ApiError>,
}

impl TryFrom<ChatResponse> for Generation {
    type Error = ProviderError;

    fn try_from(response: ChatResponse) -> Result<Self, Self::Error> {
        if let Some(error) = response.error {
            return Err(ProviderError::InvalidResponse(format!(
                "OpenRouter API error: {}",
                error.message
            )));
        }

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let mut generation = Generation::new(content);
        if let Some(usage) = response.usage {
            generation = generation.with_metadata("usage", usage);
        }
        if let Some(id) = response.id {
            generation = generation.with_metadata("id", Value::from(id));
        }
        Ok(generation)
    }
}

pub struct OpenRouterProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(config: &FileOpenRouterConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        OPENROUTER_PROVIDER
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("OpenRouter API key is not set".to_string())
        })?;

        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model, prompt_len = prompt.len(), "Calling OpenRouter chat API");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
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
            .map_err(|e| ProviderError::InvalidResponse(format!("OpenRouter: {}", e)))?;
        parsed.try_into()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
