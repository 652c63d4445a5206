//! Configuration file loading for llm-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LLM_CONSENSUS_*` environment variables (nested with `__`)
//! 2. Legacy variables: `OLLAMA_MODELS`, `OPENROUTER_MODELS`, `BEDROCK_MODELS`,
//!    `MAX_ITERATIONS`, `CONSENSUS_THRESHOLD`
//! 3. `--config <path>` specified file
//! 4. Project root: `./consensus.toml` or `./.consensus.toml`
//! 5. Global: `~/.config/llm-consensus/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, DEFAULT_MAX_CONCURRENT_REQUESTS, FileBedrockConfig,
    FileChunkingConfig, FileConfig, FileOllamaConfig, FileOpenRouterConfig,
    FileOrchestrationConfig, FileOutputConfig, FilePersonaConfig, FileProvidersConfig,
    FileStorageConfig, KNOWN_PROVIDERS, Severity, StorageBackend,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
