//! Iteration phases

use serde::{Deserialize, Serialize};

/// Phases of one consensus iteration.
///
/// Phases never overlap: every call of one phase settles before the next
/// phase starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every active agent answers the current prompt
    Generation,
    /// Every agent critiques every other agent's answer
    Evaluation,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generation => "generation",
            Phase::Evaluation => "evaluation",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
