//! LLM backend adapters
//!
//! Each backend implements [`LlmProvider`](consensus_application::LlmProvider).
//! [`ThrottledProvider`] and [`PersonaProvider`] decorate any backend, and
//! [`AgentFactory`] turns the `[providers]` / `[[personas]]` configuration
//! into the agent roster.

pub mod factory;
pub mod ollama;
pub mod openrouter;
pub mod persona;
pub mod throttle;

#[cfg(feature = "bedrock")]
pub mod bedrock;

pub use factory::AgentFactory;
pub use ollama::{OLLAMA_PROVIDER, OllamaProvider};
pub use openrouter::{OPENROUTER_PROVIDER, OpenRouterProvider};
pub use persona::PersonaProvider;
pub use throttle::ThrottledProvider;

use consensus_application::ProviderError;
use std::time::Duration;

/// Build an HTTP client with a whole-request timeout.
pub(crate) fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ProviderError::Other(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn map_request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::Other(e.to_string())
    }
}
