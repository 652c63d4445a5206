//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod orchestration;
mod output;
mod providers;
mod storage;

pub use orchestration::{FileChunkingConfig, FileOrchestrationConfig};
pub use output::FileOutputConfig;
pub use providers::{
    DEFAULT_MAX_CONCURRENT_REQUESTS, FileBedrockConfig, FileOllamaConfig, FileOpenRouterConfig,
    FilePersonaConfig, FileProvidersConfig,
};
pub use storage::{FileStorageConfig, StorageBackend};

use consensus_domain::{ChunkingError, validate_window};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend names understood by the agent factory
pub const KNOWN_PROVIDERS: [&str; 3] = ["ollama", "openrouter", "bedrock"];

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("orchestration.max_iterations must be at least 1")]
    ZeroIterations,

    #[error("orchestration.consensus_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("chunking: {0}")]
    InvalidWindow(#[from] ChunkingError),

    #[error(
        "chunking.direct_threshold ({direct_threshold}) is not larger than chunking.chunk_size ({chunk_size})"
    )]
    DirectThresholdTooSmall {
        direct_threshold: usize,
        chunk_size: usize,
    },

    #[error("{section}: model name cannot be empty")]
    EmptyModelName { section: String },

    #[error("providers.{provider}.max_concurrent_requests cannot be 0")]
    ZeroConcurrency { provider: &'static str },

    #[error("providers.{provider}.timeout_seconds cannot be 0")]
    InvalidTimeout { provider: &'static str },

    #[error("personas[{index}]: unknown provider '{provider}'")]
    UnknownPersonaProvider { index: usize, provider: String },

    #[error("personas[{index}]: persona cannot be empty")]
    EmptyPersona { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Start-up continues
    Warning,
    /// Start-up aborts
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
}

impl ConfigIssue {
    fn error(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    fn warning(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Iteration loop settings
    pub orchestration: FileOrchestrationConfig,
    /// Map-reduce token windows
    pub chunking: FileChunkingConfig,
    /// Audit store settings
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Backend settings and model lists
    pub providers: FileProvidersConfig,
    /// Additional persona-decorated agents
    pub personas: Vec<FilePersonaConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Orchestration
        if self.orchestration.max_iterations == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroIterations));
        }
        let threshold = self.orchestration.consensus_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            issues.push(ConfigIssue::error(
                ConfigValidationError::ThresholdOutOfRange(threshold),
            ));
        }

        // 2. Chunking
        if let Err(e) = validate_window(self.chunking.chunk_size, self.chunking.overlap) {
            issues.push(ConfigIssue::error(e.into()));
        }
        if self.chunking.direct_threshold <= self.chunking.chunk_size {
            issues.push(ConfigIssue::warning(
                ConfigValidationError::DirectThresholdTooSmall {
                    direct_threshold: self.chunking.direct_threshold,
                    chunk_size: self.chunking.chunk_size,
                },
            ));
        }

        // 3. Providers
        for (provider, models) in self.providers.model_lists() {
            if models.iter().any(|m| m.trim().is_empty()) {
                issues.push(ConfigIssue::error(ConfigValidationError::EmptyModelName {
                    section: format!("providers.{}", provider),
                }));
            }
        }
        for (provider, limit) in [
            ("ollama", self.providers.ollama.max_concurrent_requests),
            ("openrouter", self.providers.openrouter.max_concurrent_requests),
            ("bedrock", self.providers.bedrock.max_concurrent_requests),
        ] {
            if limit == 0 {
                issues.push(ConfigIssue::error(ConfigValidationError::ZeroConcurrency {
                    provider,
                }));
            }
        }
        for (provider, timeout) in [
            ("ollama", self.providers.ollama.timeout_seconds),
            ("openrouter", self.providers.openrouter.timeout_seconds),
        ] {
            if timeout == 0 {
                issues.push(ConfigIssue::error(ConfigValidationError::InvalidTimeout {
                    provider,
                }));
            }
        }

        // 4. Personas
        for (index, persona) in self.personas.iter().enumerate() {
            if !KNOWN_PROVIDERS.contains(&persona.provider.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigValidationError::UnknownPersonaProvider {
                        index,
                        provider: persona.provider.clone(),
                    },
                ));
            }
            if persona.model.trim().is_empty() {
                issues.push(ConfigIssue::error(ConfigValidationError::EmptyModelName {
                    section: format!("personas[{}]", index),
                }));
            }
            if persona.persona.trim().is_empty() {
                issues.push(ConfigIssue::error(ConfigValidationError::EmptyPersona {
                    index,
                }));
            }
        }

        issues
    }
}
