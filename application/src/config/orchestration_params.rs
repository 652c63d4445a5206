//! Orchestration parameters — iteration loop control.
//!
//! [`OrchestrationParams`] groups the static parameters that control the
//! iteration loop in [`RunConsensusUseCase`](crate::use_cases::run_consensus::RunConsensusUseCase).

use consensus_domain::DEFAULT_CONSENSUS_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Iteration loop control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum number of generate/evaluate/aggregate cycles (>= 1).
    pub max_iterations: usize,
    /// Normalized score in `[0, 1]` the winner must reach.
    pub consensus_threshold: f64,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }
}
