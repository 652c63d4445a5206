//! Chunking parameters for map-reduce document processing.

use consensus_domain::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};

/// Documents at or below this many tokens are processed in one pass
pub const DEFAULT_DIRECT_THRESHOLD: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingParams {
    /// Maximum tokens per chunk
    pub chunk_size: usize,
    /// Tokens shared by consecutive chunks
    pub overlap: usize,
    /// Largest document (inclusive) that skips chunking
    pub direct_threshold: usize,
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            direct_threshold: DEFAULT_DIRECT_THRESHOLD,
        }
    }
}

impl ChunkingParams {
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_direct_threshold(mut self, threshold: usize) -> Self {
        self.direct_threshold = threshold;
        self
    }
}
