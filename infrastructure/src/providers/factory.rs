//! Agent roster assembly
//!
//! Turns the `[providers]` and `[[personas]]` configuration into the list of
//! [`ActiveAgent`]s taking part in a run. Each backend is wrapped once in a
//! [`ThrottledProvider`]; every agent of that backend (persona agents
//! included) shares it.

use super::persona::PersonaProvider;
use super::throttle::ThrottledProvider;
use super::{OLLAMA_PROVIDER, OPENROUTER_PROVIDER, OllamaProvider, OpenRouterProvider};
use crate::config::{FileConfig, FilePersonaConfig};
use consensus_application::{ActiveAgent, LlmProvider, ProviderError};
use consensus_domain::{AgentId, Persona};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "bedrock")]
use super::bedrock::{BEDROCK_PROVIDER, BedrockProvider};
#[cfg(not(feature = "bedrock"))]
const BEDROCK_PROVIDER: &str = "bedrock";

/// Fewer agents than this cannot cross-evaluate meaningfully
const RECOMMENDED_MIN_AGENTS: usize = 2;

struct Backend {
    provider: Arc<dyn LlmProvider>,
    models: Vec<String>,
}

/// Builds the agent roster from configured backends.
#[derive(Default)]
pub struct AgentFactory {
    backends: Vec<Backend>,
    personas: Vec<FilePersonaConfig>,
}

impl AgentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every backend that has models or persona agents.
    pub async fn from_config(config: &FileConfig) -> Result<Self, ProviderError> {
        let providers = &config.providers;
        let wanted = |name: &str, models: &[String]| {
            !models.is_empty() || config.personas.iter().any(|p| p.provider == name)
        };

        let mut factory = Self::new().with_personas(config.personas.clone());

        if wanted(BEDROCK_PROVIDER, &providers.bedrock.models) {
            #[cfg(feature = "bedrock")]
            {
                let bedrock = BedrockProvider::new(&providers.bedrock).await;
                factory = factory.with_backend(
                    Arc::new(bedrock),
                    providers.bedrock.models.clone(),
                    providers.bedrock.max_concurrent_requests,
                );
            }
            #[cfg(not(feature = "bedrock"))]
            warn!("Bedrock models configured but this build lacks the `bedrock` feature; skipping");
        }

        if wanted(OPENROUTER_PROVIDER, &providers.openrouter.models) {
            factory = factory.with_backend(
                Arc::new(OpenRouterProvider::new(&providers.openrouter)?),
                providers.openrouter.models.clone(),
                providers.openrouter.max_concurrent_requests,
            );
        }

        if wanted(OLLAMA_PROVIDER, &providers.ollama.models) {
            factory = factory.with_backend(
                Arc::new(OllamaProvider::new(&providers.ollama)?),
                providers.ollama.models.clone(),
                providers.ollama.max_concurrent_requests,
            );
        }

        Ok(factory)
    }

    /// Register a backend; its agents come after those already registered.
    pub fn with_backend(
        mut self,
        provider: Arc<dyn LlmProvider>,
        models: Vec<String>,
        max_concurrent: usize,
    ) -> Self {
        self.backends.push(Backend {
            provider: Arc::new(ThrottledProvider::new(provider, max_concurrent)),
            models,
        });
        self
    }

    pub fn with_personas(mut self, personas: Vec<FilePersonaConfig>) -> Self {
        self.personas = personas;
        self
    }

    fn backend(&self, name: &str) -> Option<&Backend> {
        self.backends.iter().find(|b| b.provider.name() == name)
    }

    /// Assemble the roster: plain agents in backend order, then persona agents.
    ///
    /// Backends that are not configured are skipped with a warning, as are
    /// duplicate identities.
    pub fn agents(&self) -> Vec<ActiveAgent> {
        let mut agents = Vec::new();
        let mut seen = HashSet::new();

        let mut push = |agent: ActiveAgent, agents: &mut Vec<ActiveAgent>| {
            if seen.insert(agent.id.clone()) {
                agents.push(agent);
            } else {
                warn!(agent = %agent.id, "Duplicate agent in configuration; skipping");
            }
        };

        for backend in &self.backends {
            if backend.models.is_empty() {
                continue;
            }
            if !backend.provider.is_configured() {
                warn!(
                    provider = backend.provider.name(),
                    "Provider is not configured; skipping its models"
                );
                continue;
            }
            for model in &backend.models {
                let id = AgentId::for_model(backend.provider.name(), model);
                push(
                    ActiveAgent::new(id, model.clone(), backend.provider.clone()),
                    &mut agents,
                );
            }
        }

        for entry in &self.personas {
            let Some(backend) = self.backend(&entry.provider) else {
                warn!(provider = %entry.provider, "Persona references unavailable provider; skipping");
                continue;
            };
            if !backend.provider.is_configured() {
                warn!(
                    provider = %entry.provider,
                    persona = %entry.persona,
                    "Provider is not configured; skipping persona agent"
                );
                continue;
            }

            let id = AgentId::for_model(&entry.provider, &entry.model).with_persona(&entry.persona);
            let provider = PersonaProvider::new(
                backend.provider.clone(),
                Persona::resolve(&entry.persona),
            );
            push(
                ActiveAgent::new(id, entry.model.clone(), Arc::new(provider)),
                &mut agents,
            );
        }

        if agents.len() < RECOMMENDED_MIN_AGENTS {
            warn!(
                agents = agents.len(),
                "Fewer than {} agents available; at least {} are recommended for consensus",
                RECOMMENDED_MIN_AGENTS,
                RECOMMENDED_MIN_AGENTS
            );
        } else {
            info!(agents = agents.len(), "Agent roster assembled");
        }

        agents
    }
}
