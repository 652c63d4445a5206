//! Orchestration and chunking configuration from TOML
//! (`[orchestration]` and `[chunking]` sections)

use consensus_application::{ChunkingParams, OrchestrationParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Maximum generate/evaluate/aggregate cycles
    pub max_iterations: usize,
    /// Normalized winning score required for consensus
    pub consensus_threshold: f64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            max_iterations: params.max_iterations,
            consensus_threshold: params.consensus_threshold,
        }
    }
}

impl FileOrchestrationConfig {
    pub fn to_params(&self) -> OrchestrationParams {
        OrchestrationParams::default()
            .with_max_iterations(self.max_iterations)
            .with_consensus_threshold(self.consensus_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    /// Documents up to this many tokens skip map-reduce
    pub direct_threshold: usize,
}

impl Default for FileChunkingConfig {
    fn default() -> Self {
        let params = ChunkingParams::default();
        Self {
            chunk_size: params.chunk_size,
            overlap: params.overlap,
            direct_threshold: params.direct_threshold,
        }
    }
}

impl FileChunkingConfig {
    pub fn to_params(&self) -> ChunkingParams {
        ChunkingParams::default()
            .with_chunk_size(self.chunk_size)
            .with_overlap(self.overlap)
            .with_direct_threshold(self.direct_threshold)
    }
}
