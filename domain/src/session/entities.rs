//! Audit session entities
//!
//! A session groups everything one logical run produced (responses,
//! evaluations, chunks) so it can be inspected afterwards. The consensus
//! logic only writes these records; it never reads them back.

use crate::consensus::{Evaluation, Response};
use crate::core::agent::AgentId;
use crate::processing::Chunk;
use serde::{Deserialize, Serialize};

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque chunk record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// Whether the session has reached a final state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Running)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored session header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub prompt: String,
    pub status: SessionStatus,
    /// Winning content once the session completed
    pub result: Option<String>,
    /// RFC 3339 creation time
    pub created_at: String,
    /// RFC 3339 completion time, set on a terminal status
    pub completed_at: Option<String>,
}

/// A response as recorded in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub session_id: SessionId,
    pub iteration: usize,
    pub agent_id: AgentId,
    pub content: String,
}

impl StoredResponse {
    pub fn from_response(session_id: SessionId, iteration: usize, response: &Response) -> Self {
        Self {
            session_id,
            iteration,
            agent_id: response.agent_id.clone(),
            content: response.content.clone(),
        }
    }
}

/// An evaluation as recorded in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    pub session_id: SessionId,
    pub iteration: usize,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

/// A chunk as recorded in a document-processing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: ChunkId,
    pub session_id: SessionId,
    #[serde(flatten)]
    pub chunk: Chunk,
}
