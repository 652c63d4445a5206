//! Domain layer for llm-consensus
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Consensus
//!
//! Several independent agents answer the same prompt. Every agent then scores
//! every other agent's answer on four criteria (accuracy, relevance,
//! completeness, clarity). The answer with the highest mean score wins, and
//! consensus is reached when that score clears a configurable threshold.
//!
//! ## Map-Reduce
//!
//! Documents too large for one prompt are split into overlapping token
//! windows ([`Chunker`]); each window runs its own consensus and the partial
//! results are merged by one final consensus run.

pub mod config;
pub mod consensus;
pub mod core;
pub mod processing;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use consensus::{
    Aggregator, ConsensusResult, DEFAULT_CONSENSUS_THRESHOLD, Evaluation, EvaluationParseError,
    FALLBACK_FEEDBACK, MAX_TOTAL_SCORE, ParsedEvaluation, Phase, Response, Score, Standing,
    parse_evaluation, rank,
};
pub use core::{agent::AgentId, string::preview};
pub use processing::{
    Chunk, Chunker, ChunkingError, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TokenId, Tokenizer,
    validate_window,
};
pub use prompt::{CHUNK_FAILURE_PLACEHOLDER, Persona, PromptTemplate};
pub use session::{
    ChunkId, SessionId, SessionRecord, SessionStatus, StoredChunk, StoredEvaluation,
    StoredResponse,
};
