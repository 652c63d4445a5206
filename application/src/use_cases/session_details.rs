//! Get Session Details use case
//!
//! Read-only summary of an audited session.

use crate::ports::audit_store::{AuditStore, StoreError};
use consensus_domain::{AgentId, SessionId, SessionRecord, preview};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Length of response previews, in characters before the ellipsis
pub const PREVIEW_LENGTH: usize = 100;

#[derive(Error, Debug)]
pub enum SessionDetailsError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Audit store error: {0}")]
    Store(#[from] StoreError),
}

/// One response line in the session summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePreview {
    pub agent_id: AgentId,
    pub iteration: usize,
    pub content_preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetails {
    pub session: SessionRecord,
    pub response_count: usize,
    pub evaluation_count: usize,
    pub chunk_count: usize,
    pub responses: Vec<ResponsePreview>,
    /// The session's final result, if it completed with a winner
    pub best_response: Option<String>,
}

pub struct GetSessionDetailsUseCase {
    store: Arc<dyn AuditStore>,
}

impl GetSessionDetailsUseCase {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self, session_id: &SessionId) -> Result<SessionDetails, SessionDetailsError> {
        let session = self
            .store
            .get_session(session_id)?
            .ok_or_else(|| SessionDetailsError::NotFound(session_id.clone()))?;

        let responses = self.store.get_responses(session_id, None)?;
        let evaluation_count = self.store.get_evaluations(session_id, None)?.len();
        let chunk_count = self.store.get_chunks(session_id)?.len();

        Ok(SessionDetails {
            best_response: session.result.clone(),
            session,
            response_count: responses.len(),
            evaluation_count,
            chunk_count,
            responses: responses
                .into_iter()
                .map(|r| ResponsePreview {
                    agent_id: r.agent_id,
                    iteration: r.iteration,
                    content_preview: preview(&r.content, PREVIEW_LENGTH),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{
        Chunk, ChunkId, Evaluation, SessionStatus, StoredChunk, StoredEvaluation, StoredResponse,
    };

    /// Serves a single fixed session
    struct FixedStore {
        session: SessionRecord,
    }

    impl AuditStore for FixedStore {
        fn create_session(&self, _prompt: &str) -> Result<SessionId, StoreError> {
            Ok(self.session.id.clone())
        }

        fn update_session_status(
            &self,
            _id: &SessionId,
            _status: SessionStatus,
            _result: Option<&str>,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
            Ok((id == &self.session.id).then(|| self.session.clone()))
        }

        fn add_response(&self, _response: StoredResponse) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_responses(
            &self,
            session_id: &SessionId,
            _iteration: Option<usize>,
        ) -> Result<Vec<StoredResponse>, StoreError> {
            Ok(vec![
                StoredResponse {
                    session_id: session_id.clone(),
                    iteration: 1,
                    agent_id: AgentId::new("ollama:llama3"),
                    content: "x".repeat(150),
                },
                StoredResponse {
                    session_id: session_id.clone(),
                    iteration: 2,
                    agent_id: AgentId::new("openrouter:gpt"),
                    content: "short".to_string(),
                },
                StoredResponse {
                    session_id: session_id.clone(),
                    iteration: 2,
                    agent_id: AgentId::new("ollama:qwen"),
                    content: "合意".repeat(80),
                },
            ])
        }

        fn add_evaluation(&self, _evaluation: StoredEvaluation) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_evaluations(
            &self,
            session_id: &SessionId,
            _iteration: Option<usize>,
        ) -> Result<Vec<StoredEvaluation>, StoreError> {
            Ok(vec![StoredEvaluation {
                session_id: session_id.clone(),
                iteration: 1,
                evaluation: Evaluation::fallback("a".into(), "b".into()),
            }])
        }

        fn add_chunk(&self, _session_id: &SessionId, _chunk: &Chunk) -> Result<ChunkId, StoreError> {
            Ok(ChunkId::new("c"))
        }

        fn update_chunk_result(&self, _id: &ChunkId, _result: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_chunks(&self, _session_id: &SessionId) -> Result<Vec<StoredChunk>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn use_case() -> GetSessionDetailsUseCase {
        GetSessionDetailsUseCase::new(Arc::new(FixedStore {
            session: SessionRecord {
                id: SessionId::new("abc"),
                prompt: "Q".to_string(),
                status: SessionStatus::Completed,
                result: Some("the answer".to_string()),
                created_at: "2026-01-01T00:00:00Z".to_string(),
                completed_at: Some("2026-01-01T00:01:00Z".to_string()),
            },
        }))
    }

    #[test]
    fn test_details_summarize_session() {
        let details = use_case().execute(&SessionId::new("abc")).unwrap();

        assert_eq!(details.response_count, 3);
        assert_eq!(details.evaluation_count, 1);
        assert_eq!(details.chunk_count, 0);
        assert_eq!(details.best_response.as_deref(), Some("the answer"));

        assert_eq!(details.responses[0].content_preview.len(), 103);
        assert!(details.responses[0].content_preview.ends_with("..."));
        assert_eq!(details.responses[1].content_preview, "short...");
        assert_eq!(details.responses[1].iteration, 2);
    }

    #[test]
    fn test_preview_cut_by_characters() {
        let details = use_case().execute(&SessionId::new("abc")).unwrap();

        let preview = &details.responses[2].content_preview;
        assert_eq!(preview.chars().count(), PREVIEW_LENGTH + 3);
        assert!(preview.starts_with("合意合意"));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_unknown_session() {
        let result = use_case().execute(&SessionId::new("missing"));
        assert!(matches!(result, Err(SessionDetailsError::NotFound(id)) if id.as_str() == "missing"));
    }
}
