//! Audit session records

pub mod entities;

pub use entities::{
    ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
