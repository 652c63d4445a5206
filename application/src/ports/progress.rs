//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus run.

use consensus_domain::{AgentId, ConsensusResult, Phase};

/// Callback for progress updates during consensus execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when an iteration starts (1-based)
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize);

    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a task completes within a phase
    fn on_task_complete(&self, phase: &Phase, agent: &AgentId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called after aggregation with that iteration's result
    fn on_iteration_complete(&self, result: &ConsensusResult);

    // ==================== Document Callbacks ====================

    /// Called when the map phase starts over `total_chunks` chunks.
    fn on_map_start(&self, _total_chunks: usize) {}

    /// Called when one chunk's consensus run settles.
    fn on_chunk_complete(&self, _index: usize, _success: bool) {}

    /// Called before the final reduce run.
    fn on_reduce_start(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_iteration_start(&self, _iteration: usize, _max_iterations: usize) {}
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _agent: &AgentId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
    fn on_iteration_complete(&self, _result: &ConsensusResult) {}
}
