//! Audit storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Append-only JSON-lines file
    #[default]
    Jsonl,
    /// Process-local, lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// JSONL file path (ignored by the memory backend)
    pub path: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Jsonl,
            path: "consensus.jsonl".to_string(),
        }
    }
}
