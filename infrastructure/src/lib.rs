//! Infrastructure layer for llm-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: LLM backends, audit stores, the tokenizer,
//! and configuration file loading.

pub mod config;
pub mod providers;
pub mod storage;
pub mod tokenizer;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig, Severity,
    StorageBackend,
};
pub use providers::{AgentFactory, OllamaProvider, OpenRouterProvider, PersonaProvider, ThrottledProvider};
pub use storage::{InMemoryAuditStore, JsonlAuditStore};
pub use tokenizer::{TiktokenTokenizer, TokenizerError};

#[cfg(feature = "bedrock")]
pub use providers::bedrock::BedrockProvider;
