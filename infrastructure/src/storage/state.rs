//! Audit records and the in-memory state they fold into
//!
//! Both stores keep an [`AuditState`]; the JSONL store additionally appends
//! every [`AuditRecord`] to disk and replays them on open.

use consensus_application::StoreError;
use consensus_domain::{
    ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
use serde::{Deserialize, Serialize};

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// One state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditRecord {
    SessionCreated {
        session: SessionRecord,
    },
    SessionUpdated {
        id: SessionId,
        status: SessionStatus,
        result: Option<String>,
        completed_at: Option<String>,
    },
    Response {
        response: StoredResponse,
    },
    Evaluation {
        evaluation: StoredEvaluation,
    },
    ChunkCreated {
        chunk: StoredChunk,
    },
    ChunkResult {
        id: ChunkId,
        result: String,
    },
}

impl AuditRecord {
    /// Status change; terminal states are stamped with the current time.
    pub fn session_updated(id: &SessionId, status: SessionStatus, result: Option<&str>) -> Self {
        AuditRecord::SessionUpdated {
            id: id.clone(),
            status,
            result: result.map(str::to_string),
            completed_at: status.is_terminal().then(now_rfc3339),
        }
    }
}

/// Everything recorded so far, in insertion order
#[derive(Debug, Default)]
pub struct AuditState {
    sessions: Vec<SessionRecord>,
    responses: Vec<StoredResponse>,
    evaluations: Vec<StoredEvaluation>,
    chunks: Vec<StoredChunk>,
}

impl AuditState {
    fn require_session(&self, id: &SessionId) -> Result<(), StoreError> {
        if self.sessions.iter().any(|s| &s.id == id) {
            Ok(())
        } else {
            Err(StoreError::SessionNotFound(id.clone()))
        }
    }

    /// Check that `record` refers to known sessions and chunks.
    pub fn validate(&self, record: &AuditRecord) -> Result<(), StoreError> {
        match record {
            AuditRecord::SessionCreated { .. } => Ok(()),
            AuditRecord::SessionUpdated { id, .. } => self.require_session(id),
            AuditRecord::Response { response } => self.require_session(&response.session_id),
            AuditRecord::Evaluation { evaluation } => {
                self.require_session(&evaluation.session_id)
            }
            AuditRecord::ChunkCreated { chunk } => self.require_session(&chunk.session_id),
            AuditRecord::ChunkResult { id, .. } => {
                if self.chunks.iter().any(|c| &c.id == id) {
                    Ok(())
                } else {
                    Err(StoreError::ChunkNotFound(id.clone()))
                }
            }
        }
    }

    /// Validate and fold `record` into the state.
    pub fn apply(&mut self, record: AuditRecord) -> Result<(), StoreError> {
        self.validate(&record)?;

        match record {
            AuditRecord::SessionCreated { session } => self.sessions.push(session),
            AuditRecord::SessionUpdated {
                id,
                status,
                result,
                completed_at,
            } => {
                if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
                    session.status = status;
                    if result.is_some() {
                        session.result = result;
                    }
                    if completed_at.is_some() {
                        session.completed_at = completed_at;
                    }
                }
            }
            AuditRecord::Response { response } => self.responses.push(response),
            AuditRecord::Evaluation { evaluation } => self.evaluations.push(evaluation),
            AuditRecord::ChunkCreated { chunk } => self.chunks.push(chunk),
            AuditRecord::ChunkResult { id, result } => {
                if let Some(stored) = self.chunks.iter_mut().find(|c| c.id == id) {
                    stored.chunk.result = Some(result);
                }
            }
        }
        Ok(())
    }

    pub fn session(&self, id: &SessionId) -> Option<SessionRecord> {
        self.sessions.iter().find(|s| &s.id == id).cloned()
    }

    pub fn responses(&self, session_id: &SessionId, iteration: Option<usize>) -> Vec<StoredResponse> {
        self.responses
            .iter()
            .filter(|r| &r.session_id == session_id)
            .filter(|r| iteration.is_none_or(|i| r.iteration == i))
            .cloned()
            .collect()
    }

    pub fn evaluations(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Vec<StoredEvaluation> {
        self.evaluations
            .iter()
            .filter(|e| &e.session_id == session_id)
            .filter(|e| iteration.is_none_or(|i| e.iteration == i))
            .cloned()
            .collect()
    }

    /// Chunks of a session ordered by document position
    pub fn chunks(&self, session_id: &SessionId) -> Vec<StoredChunk> {
        let mut chunks: Vec<_> = self
            .chunks
            .iter()
            .filter(|c| &c.session_id == session_id)
            .cloned()
            .collect();
        chunks.sort_by_key(|c| c.chunk.index);
        chunks
    }
}
