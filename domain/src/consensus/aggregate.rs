//! Score aggregation and the consensus decision.

use super::evaluation::Evaluation;
use super::response::Response;
use super::result::{ConsensusResult, Standing};
use crate::core::agent::AgentId;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Default minimum normalized score for consensus
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.75;

/// Reduces an iteration's evaluations into a consensus decision.
///
/// Pure: the output depends only on the inputs and the threshold.
///
/// # Example
///
/// ```
/// use consensus_domain::{Aggregator, Evaluation, Response, Score};
///
/// let responses = vec![Response::new("a", "A"), Response::new("b", "B")];
/// let evaluations = vec![
///     Evaluation::new("b".into(), "a".into(), Score::new(8, 8, 8, 8), "good"),
///     Evaluation::new("a".into(), "b".into(), Score::new(7, 7, 7, 7), "ok"),
/// ];
///
/// let result = Aggregator::new(0.75).aggregate(responses, evaluations, 1);
/// assert!(result.consensus_reached); // 32 / 40 = 0.8
/// assert_eq!(result.winner_content(), Some("A"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    threshold: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CONSENSUS_THRESHOLD)
    }
}

impl Aggregator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Aggregate one iteration.
    ///
    /// The winner is the target with the highest mean `total_score`; equal
    /// means go to the lexicographically smallest agent identity. With no
    /// evaluations there is no winner and no consensus.
    pub fn aggregate(
        &self,
        responses: Vec<Response>,
        evaluations: Vec<Evaluation>,
        iteration: usize,
    ) -> ConsensusResult {
        let standings = rank(&evaluations);

        let winner = standings.first().and_then(|best| {
            responses
                .iter()
                .find(|r| r.agent_id == best.agent_id)
                .cloned()
        });

        let consensus_reached = match (&winner, standings.first()) {
            (Some(_), Some(best)) => best.normalized() >= self.threshold,
            _ => false,
        };

        ConsensusResult {
            responses,
            evaluations,
            winner,
            consensus_reached,
            iteration_count: iteration,
            standings,
        }
    }
}

/// Per-target mean scores, best first, ties by ascending agent identity.
pub fn rank(evaluations: &[Evaluation]) -> Vec<Standing> {
    let mut totals: BTreeMap<&AgentId, (u32, usize)> = BTreeMap::new();
    for eval in evaluations {
        let entry = totals.entry(&eval.target_id).or_insert((0, 0));
        entry.0 += eval.total_score;
        entry.1 += 1;
    }

    let mut standings: Vec<Standing> = totals
        .into_iter()
        .map(|(agent_id, (sum, count))| Standing {
            agent_id: agent_id.clone(),
            mean_score: f64::from(sum) / count as f64,
            evaluation_count: count,
        })
        .collect();

    standings.sort_by(|a, b| {
        b.mean_score
            .partial_cmp(&a.mean_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });

    standings
}
