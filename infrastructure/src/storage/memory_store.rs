//! Process-local audit store

use super::state::{AuditRecord, AuditState, now_rfc3339};
use consensus_application::{AuditStore, StoreError};
use consensus_domain::{
    Chunk, ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Keeps every record in memory; nothing survives the process.
#[derive(Default)]
pub struct InMemoryAuditStore {
    state: Mutex<AuditState>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, AuditState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("audit state lock poisoned".to_string()))
    }

    fn commit(&self, record: AuditRecord) -> Result<(), StoreError> {
        self.state()?.apply(record)
    }
}

impl AuditStore for InMemoryAuditStore {
    fn create_session(&self, prompt: &str) -> Result<SessionId, StoreError> {
        let id = SessionId::new(Uuid::new_v4().to_string());
        self.commit(AuditRecord::SessionCreated {
            session: SessionRecord {
                id: id.clone(),
                prompt: prompt.to_string(),
                status: SessionStatus::Running,
                result: None,
                created_at: now_rfc3339(),
                completed_at: None,
            },
        })?;
        Ok(id)
    }

    fn update_session_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
        result: Option<&str>,
    ) -> Result<(), StoreError> {
        self.commit(AuditRecord::session_updated(id, status, result))
    }

    fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.state()?.session(id))
    }

    fn add_response(&self, response: StoredResponse) -> Result<(), StoreError> {
        self.commit(AuditRecord::Response { response })
    }

    fn get_responses(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredResponse>, StoreError> {
        Ok(self.state()?.responses(session_id, iteration))
    }

    fn add_evaluation(&self, evaluation: StoredEvaluation) -> Result<(), StoreError> {
        self.commit(AuditRecord::Evaluation { evaluation })
    }

    fn get_evaluations(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredEvaluation>, StoreError> {
        Ok(self.state()?.evaluations(session_id, iteration))
    }

    fn add_chunk(&self, session_id: &SessionId, chunk: &Chunk) -> Result<ChunkId, StoreError> {
        let id = ChunkId::new(Uuid::new_v4().to_string());
        self.commit(AuditRecord::ChunkCreated {
            chunk: StoredChunk {
                id: id.clone(),
                session_id: session_id.clone(),
                chunk: chunk.clone(),
            },
        })?;
        Ok(id)
    }

    fn update_chunk_result(&self, id: &ChunkId, result: &str) -> Result<(), StoreError> {
        self.commit(AuditRecord::ChunkResult {
            id: id.clone(),
            result: result.to_string(),
        })
    }

    fn get_chunks(&self, session_id: &SessionId) -> Result<Vec<StoredChunk>, StoreError> {
        Ok(self.state()?.chunks(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{AgentId, Evaluation, Score};

    #[test]
    fn test_session_lifecycle() {
        let store = InMemoryAuditStore::new();
        let id = store.create_session("What is Rust?").unwrap();

        let session = store.get_session(&id).unwrap().unwrap();
        assert_eq!(session.prompt, "What is Rust?");
        assert_eq!(session.status, SessionStatus::Running);
        assert!(session.completed_at.is_none());

        store
            .update_session_status(&id, SessionStatus::Completed, Some("A language."))
            .unwrap();
        let session = store.get_session(&id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.result.as_deref(), Some("A language."));
        assert!(session.completed_at.is_some());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let store = InMemoryAuditStore::new();
        let a = store.create_session("a").unwrap();
        let b = store.create_session("b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_session() {
        let store = InMemoryAuditStore::new();
        let missing = SessionId::new("missing");
        assert!(store.get_session(&missing).unwrap().is_none());
        assert!(matches!(
            store.update_session_status(&missing, SessionStatus::Failed, None),
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_responses_and_evaluations_filter_by_iteration() {
        let store = InMemoryAuditStore::new();
        let id = store.create_session("Q").unwrap();
        let other = store.create_session("Other").unwrap();

        for (session, iteration, agent) in [
            (&id, 1, "a"),
            (&id, 1, "b"),
            (&id, 2, "a"),
            (&other, 1, "a"),
        ] {
            store
                .add_response(StoredResponse {
                    session_id: session.clone(),
                    iteration,
                    agent_id: AgentId::new(agent),
                    content: format!("{}-{}", agent, iteration),
                })
                .unwrap();
        }
        store
            .add_evaluation(StoredEvaluation {
                session_id: id.clone(),
                iteration: 2,
                evaluation: Evaluation::new(
                    "a".into(),
                    "b".into(),
                    Score::new(9, 9, 9, 9),
                    "Great",
                ),
            })
            .unwrap();

        assert_eq!(store.get_responses(&id, None).unwrap().len(), 3);
        let first = store.get_responses(&id, Some(1)).unwrap();
        assert_eq!(
            first.iter().map(|r| r.content.as_str()).collect::<Vec<_>>(),
            vec!["a-1", "b-1"]
        );
        assert!(store.get_evaluations(&id, Some(1)).unwrap().is_empty());
        assert_eq!(store.get_evaluations(&id, Some(2)).unwrap().len(), 1);
        assert!(store.get_evaluations(&other, None).unwrap().is_empty());
    }

    #[test]
    fn test_chunks() {
        let store = InMemoryAuditStore::new();
        let id = store.create_session("[Document Processing] Summarize").unwrap();

        let second = store.add_chunk(&id, &Chunk::new(1, "part two", 2)).unwrap();
        let first = store.add_chunk(&id, &Chunk::new(0, "part one", 2)).unwrap();
        store.update_chunk_result(&first, "summary one").unwrap();

        let chunks = store.get_chunks(&id).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, first);
        assert_eq!(chunks[0].chunk.result.as_deref(), Some("summary one"));
        assert_eq!(chunks[1].id, second);
        assert!(chunks[1].chunk.result.is_none());

        assert!(matches!(
            store.update_chunk_result(&ChunkId::new("nope"), "x"),
            Err(StoreError::ChunkNotFound(_))
        ));
    }
}
