//! Provider configuration from TOML (`[providers]` and `[[personas]]` sections)

use serde::{Deserialize, Serialize};

/// Default number of in-flight requests per backend
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Ollama (local) backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub base_url: String,
    pub models: Vec<String>,
    pub max_concurrent_requests: usize,
    pub timeout_seconds: u64,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            models: Vec::new(),
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_seconds: 300,
        }
    }
}

/// OpenRouter (OpenAI-compatible) backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended — use env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub max_concurrent_requests: usize,
    pub timeout_seconds: u64,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            models: Vec::new(),
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_seconds: 120,
        }
    }
}

impl FileOpenRouterConfig {
    /// Resolve the API key: direct value first, then the named env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// AWS Bedrock backend (requires the `bedrock` feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBedrockConfig {
    /// AWS region for Bedrock models (default: "us-east-1")
    pub region: String,
    /// AWS profile name for credentials
    pub profile: Option<String>,
    /// Max tokens per response (default: 4096)
    pub max_tokens: i32,
    pub models: Vec<String>,
    pub max_concurrent_requests: usize,
}

impl Default for FileBedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            max_tokens: 4096,
            models: Vec::new(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub ollama: FileOllamaConfig,
    pub openrouter: FileOpenRouterConfig,
    pub bedrock: FileBedrockConfig,
}

impl FileProvidersConfig {
    /// `(backend name, configured model names)` for every backend
    pub fn model_lists(&self) -> [(&'static str, &[String]); 3] {
        [
            ("ollama", &self.ollama.models),
            ("openrouter", &self.openrouter.models),
            ("bedrock", &self.bedrock.models),
        ]
    }
}

/// An extra agent decorated with a persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePersonaConfig {
    /// Backend name (`ollama`, `openrouter`, `bedrock`)
    pub provider: String,
    pub model: String,
    /// Preset key (`critical`, `creative`, ...) or a free-form role
    pub persona: String,
}
