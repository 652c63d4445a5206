//! Evaluator
//!
//! Asks one agent to critique another agent's response and turns the free
//! form answer into an [`Evaluation`]. Evaluation never fails: any problem
//! along the way yields the fixed-penalty fallback.

use crate::ports::llm_provider::ActiveAgent;
use consensus_domain::{Evaluation, PromptTemplate, Response, parse_evaluation};
use tracing::{debug, warn};

/// Cross-evaluation of one response by one agent
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Have `evaluator` score `target` against `original_prompt`.
    pub async fn evaluate(
        &self,
        evaluator: &ActiveAgent,
        original_prompt: &str,
        target: &Response,
    ) -> Evaluation {
        let prompt = PromptTemplate::evaluation_prompt(original_prompt, &target.content);

        let raw = match evaluator.complete(&prompt).await {
            Ok(generation) => generation.content,
            Err(e) => {
                warn!(
                    evaluator = %evaluator.id,
                    target = %target.agent_id,
                    "Evaluation request failed: {}", e
                );
                return Evaluation::fallback(evaluator.id.clone(), target.agent_id.clone());
            }
        };

        match parse_evaluation(&raw) {
            Ok(parsed) => {
                let evaluation =
                    parsed.into_evaluation(evaluator.id.clone(), target.agent_id.clone());
                debug!(
                    evaluator = %evaluator.id,
                    target = %target.agent_id,
                    total = evaluation.total_score,
                    "Evaluation parsed"
                );
                evaluation
            }
            Err(e) => {
                warn!(
                    evaluator = %evaluator.id,
                    target = %target.agent_id,
                    "Could not parse evaluation: {}", e
                );
                Evaluation::fallback(evaluator.id.clone(), target.agent_id.clone())
            }
        }
    }
}
