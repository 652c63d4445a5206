//! Generated response value object

use crate::core::agent::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One agent's answer to the current prompt in one iteration.
///
/// Responses are immutable once created and owned by the iteration that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The agent that generated this response
    pub agent_id: AgentId,
    /// The generated text
    pub content: String,
    /// Backend-specific details (token usage, persona, timings, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Response {
    pub fn new(agent_id: impl Into<AgentId>, content: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Attach backend metadata to the response.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}
