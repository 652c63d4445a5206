//! Agent identity value object

use serde::{Deserialize, Serialize};

/// Stable, unique identity of one agent in the active set.
///
/// An agent is one backend plus one model identifier, optionally decorated
/// with a persona. The canonical textual form is `"{provider}:{model}"`, or
/// `"{provider}:{model}#{persona}"` for persona agents.
///
/// # Example
///
/// ```
/// use consensus_domain::AgentId;
///
/// let id = AgentId::for_model("ollama", "llama3.1");
/// assert_eq!(id.as_str(), "ollama:llama3.1");
///
/// let critic = id.with_persona("critical");
/// assert_eq!(critic.as_str(), "ollama:llama3.1#critical");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates an AgentId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the canonical `provider:model` identity.
    pub fn for_model(provider: &str, model: &str) -> Self {
        Self(format!("{}:{}", provider, model))
    }

    /// Appends a persona suffix to this identity.
    pub fn with_persona(&self, persona: &str) -> Self {
        Self(format!("{}#{}", self.0, persona.to_lowercase()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_suffix_is_lowercased() {
        let id = AgentId::for_model("openrouter", "gpt-4o").with_persona("Critical");
        assert_eq!(id.to_string(), "openrouter:gpt-4o#critical");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = AgentId::from("bedrock:claude");
        let b = AgentId::from("ollama:llama3.1");
        assert!(a < b);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = AgentId::from("ollama:qwen2.5");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ollama:qwen2.5\"");
    }
}
