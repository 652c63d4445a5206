//! LLM provider port
//!
//! Defines the interface for communicating with generation backends.

use async_trait::async_trait;
use consensus_domain::{AgentId, Response};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a generation call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Text produced by one generation call, plus backend-specific metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl Generation {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A generation backend
///
/// This port defines how the application layer talks to LLM backends.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Backend name used in agent identities (e.g. `ollama`)
    fn name(&self) -> &str;

    /// Generate a completion for a single user prompt
    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError>;

    /// Whether the backend has everything it needs (credentials, endpoint)
    fn is_configured(&self) -> bool;
}

/// One participant: a backend bound to a model under a stable identity.
///
/// Agents act both as generators and as evaluators of their peers.
#[derive(Clone)]
pub struct ActiveAgent {
    pub id: AgentId,
    pub model: String,
    pub provider: Arc<dyn LlmProvider>,
}

impl ActiveAgent {
    pub fn new(id: AgentId, model: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            id,
            model: model.into(),
            provider,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Raw completion for `prompt`.
    pub async fn complete(&self, prompt: &str) -> Result<Generation, ProviderError> {
        self.provider.generate(&self.model, prompt).await
    }

    /// Generate this agent's [`Response`] to `prompt`.
    pub async fn respond(&self, prompt: &str) -> Result<Response, ProviderError> {
        let generation = self.complete(prompt).await?;
        Ok(Response::new(self.id.clone(), generation.content).with_metadata(generation.metadata))
    }
}

impl std::fmt::Debug for ActiveAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveAgent")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("provider", &self.provider.name())
            .finish()
    }
}
