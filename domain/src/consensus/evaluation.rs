//! Score and evaluation value objects
//!
//! An [`Evaluation`] is one agent's critique of another agent's response,
//! scored on four criteria from 1 to 10.

use crate::core::agent::AgentId;
use serde::{Deserialize, Serialize};

/// Lowest allowed subscore
pub const MIN_SCORE: u8 = 1;
/// Highest allowed subscore
pub const MAX_SCORE: u8 = 10;
/// Highest possible total (4 criteria x 10)
pub const MAX_TOTAL_SCORE: u32 = 40;

/// Feedback text attached to fallback evaluations
pub const FALLBACK_FEEDBACK: &str = "Evaluation failed due to technical error.";

/// Four-criteria score, each criterion in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub accuracy: u8,
    pub relevance: u8,
    pub completeness: u8,
    pub clarity: u8,
}

impl Score {
    /// Build a score, clamping every criterion into `[1, 10]`.
    pub fn new(accuracy: u8, relevance: u8, completeness: u8, clarity: u8) -> Self {
        let clamp = |v: u8| v.clamp(MIN_SCORE, MAX_SCORE);
        Self {
            accuracy: clamp(accuracy),
            relevance: clamp(relevance),
            completeness: clamp(completeness),
            clarity: clamp(clarity),
        }
    }

    /// The minimum score on every criterion.
    pub fn minimum() -> Self {
        Self::new(MIN_SCORE, MIN_SCORE, MIN_SCORE, MIN_SCORE)
    }

    /// Sum of the four criteria, in `[4, 40]`.
    pub fn total(&self) -> u32 {
        u32::from(self.accuracy)
            + u32::from(self.relevance)
            + u32::from(self.completeness)
            + u32::from(self.clarity)
    }
}

/// One agent's critique of another agent's response.
///
/// `total_score` is always derived from `scores`; there is no way to build
/// an evaluation with an inconsistent total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Agent that produced the critique
    pub evaluator_id: AgentId,
    /// Agent whose response was critiqued
    pub target_id: AgentId,
    pub scores: Score,
    pub feedback: String,
    pub total_score: u32,
    /// True when the critique could not be obtained and the fixed penalty
    /// evaluation was substituted
    #[serde(default)]
    pub fallback: bool,
}

impl Evaluation {
    pub fn new(
        evaluator_id: AgentId,
        target_id: AgentId,
        scores: Score,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            evaluator_id,
            target_id,
            total_score: scores.total(),
            scores,
            feedback: feedback.into(),
            fallback: false,
        }
    }

    /// The fixed-penalty evaluation used whenever a critique fails.
    pub fn fallback(evaluator_id: AgentId, target_id: AgentId) -> Self {
        Self {
            fallback: true,
            ..Self::new(evaluator_id, target_id, Score::minimum(), FALLBACK_FEEDBACK)
        }
    }

    /// Total score normalized to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        f64::from(self.total_score) / f64::from(MAX_TOTAL_SCORE)
    }
}
