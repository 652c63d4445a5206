//! Consensus result types

use super::evaluation::{Evaluation, MAX_TOTAL_SCORE};
use super::response::Response;
use crate::core::agent::AgentId;
use serde::{Deserialize, Serialize};

/// Mean cross-evaluation score of one evaluated agent in an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub agent_id: AgentId,
    /// Arithmetic mean of the agent's `total_score`s (0-40 scale)
    pub mean_score: f64,
    /// Number of evaluations the mean was computed from
    pub evaluation_count: usize,
}

impl Standing {
    /// Mean score normalized to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        self.mean_score / f64::from(MAX_TOTAL_SCORE)
    }
}

/// Outcome of one generate → evaluate → aggregate iteration.
///
/// The result of the last iteration is what a consensus run returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Responses generated in this iteration
    pub responses: Vec<Response>,
    /// Cross-evaluations of those responses
    pub evaluations: Vec<Evaluation>,
    /// Best-scored response, absent when nothing was evaluated
    pub winner: Option<Response>,
    /// Whether the winner's normalized mean cleared the threshold
    pub consensus_reached: bool,
    /// 1-indexed iteration that produced this result
    pub iteration_count: usize,
    /// Every evaluated agent, best first
    #[serde(default)]
    pub standings: Vec<Standing>,
}

impl ConsensusResult {
    /// Identity of the winning agent, if any.
    pub fn winner_id(&self) -> Option<&AgentId> {
        self.winner.as_ref().map(|w| &w.agent_id)
    }

    /// Content of the winning response, if any.
    pub fn winner_content(&self) -> Option<&str> {
        self.winner.as_ref().map(|w| w.content.as_str())
    }

    /// Normalized mean score of the best-ranked agent.
    pub fn best_normalized_score(&self) -> Option<f64> {
        self.standings.first().map(Standing::normalized)
    }

    /// Evaluations whose target is the given agent.
    pub fn evaluations_of<'a>(
        &'a self,
        target: &'a AgentId,
    ) -> impl Iterator<Item = &'a Evaluation> + 'a {
        self.evaluations.iter().filter(move |e| &e.target_id == target)
    }
}
