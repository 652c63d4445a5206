//! Audit store port
//!
//! Persists what happened during a run: sessions, every response, every
//! evaluation and every chunk. The core algorithms only write here; reads
//! serve the session detail view. Write failures never abort a run.

use consensus_domain::{
    Chunk, ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
use thiserror::Error;

/// Errors raised by audit store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Chunk not found: {0}")]
    ChunkNotFound(ChunkId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for audit records
///
/// The methods are synchronous: adapters either keep everything in memory
/// or append a single line to a file.
pub trait AuditStore: Send + Sync {
    /// Create a session in `running` state and return its new id
    fn create_session(&self, prompt: &str) -> Result<SessionId, StoreError>;

    /// Set a session's status; terminal states also stamp `completed_at`
    fn update_session_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
        result: Option<&str>,
    ) -> Result<(), StoreError>;

    fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;

    fn add_response(&self, response: StoredResponse) -> Result<(), StoreError>;

    /// Responses of a session, optionally restricted to one iteration
    fn get_responses(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredResponse>, StoreError>;

    fn add_evaluation(&self, evaluation: StoredEvaluation) -> Result<(), StoreError>;

    /// Evaluations of a session, optionally restricted to one iteration
    fn get_evaluations(
        &self,
        session_id: &SessionId,
        iteration: Option<usize>,
    ) -> Result<Vec<StoredEvaluation>, StoreError>;

    /// Record a chunk and return its new id
    fn add_chunk(&self, session_id: &SessionId, chunk: &Chunk) -> Result<ChunkId, StoreError>;

    fn update_chunk_result(&self, id: &ChunkId, result: &str) -> Result<(), StoreError>;

    fn get_chunks(&self, session_id: &SessionId) -> Result<Vec<StoredChunk>, StoreError>;
}
