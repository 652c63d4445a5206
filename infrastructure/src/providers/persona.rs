//! Persona decorator
//!
//! Prepends a persona instruction block to every prompt and tags the
//! generation with the persona name. Evaluation prompts pass through the
//! decorator too, so a persona agent also judges in character.

use async_trait::async_trait;
use consensus_application::{Generation, LlmProvider, ProviderError};
use consensus_domain::Persona;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

pub struct PersonaProvider {
    inner: Arc<dyn LlmProvider>,
    persona: Persona,
}

impl PersonaProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, persona: Persona) -> Self {
        Self { inner, persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }
}

#[async_trait]
impl LlmProvider for PersonaProvider {
    /// The backend name; the persona only shows up in the agent id.
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError> {
        let prompt = self.persona.apply(prompt);

        match self.inner.generate(model, &prompt).await {
            Ok(generation) => Ok(generation
                .with_metadata("persona", Value::String(self.persona.name.clone()))),
            Err(e) => {
                error!(persona = %self.persona.name, "Persona generation failed: {}", e);
                Err(e)
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
