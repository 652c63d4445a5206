//! Application layer for llm-consensus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChunkingParams, OrchestrationParams};
pub use ports::{
    audit_store::{AuditStore, StoreError},
    llm_provider::{ActiveAgent, Generation, LlmProvider, ProviderError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::evaluate::Evaluator;
pub use use_cases::process_document::{
    NO_RESULT_MESSAGE, ProcessDocumentError, ProcessDocumentOutput, ProcessDocumentUseCase,
    REDUCE_FAILED_MESSAGE,
};
pub use use_cases::run_consensus::{
    RunConsensusError, RunConsensusInput, RunConsensusOutput, RunConsensusUseCase,
};
pub use use_cases::session_details::{
    GetSessionDetailsUseCase, ResponsePreview, SessionDetails, SessionDetailsError,
};
