//! Run Consensus use case
//!
//! Orchestrates the iteration loop. Each iteration is
//! generate → cross-evaluate → aggregate, followed by either a stop
//! (consensus reached or iteration cap hit) or a refined prompt for the
//! next round.

use crate::config::OrchestrationParams;
use crate::ports::audit_store::AuditStore;
use crate::ports::llm_provider::ActiveAgent;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::evaluate::Evaluator;
use consensus_domain::{
    Aggregator, ConsensusResult, Evaluation, Phase, PromptTemplate, Response, SessionId,
    SessionStatus, StoredEvaluation, StoredResponse,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that abort a consensus run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunConsensusError {
    #[error("No active LLM agents configured")]
    NoAgents,

    #[error("All agents failed to generate a response in iteration {iteration}")]
    EmptyGeneration { iteration: usize },
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct RunConsensusInput {
    /// The user's prompt
    pub prompt: String,
    /// Existing audit session to record into; a new one is opened otherwise
    pub session_id: Option<SessionId>,
    /// Per-run override of the configured iteration cap
    pub max_iterations: Option<usize>,
}

impl RunConsensusInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: None,
            max_iterations: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }
}

/// Final result of a run plus the audit session it was recorded under
#[derive(Debug, Clone)]
pub struct RunConsensusOutput {
    /// `None` when the audit store could not open a session
    pub session_id: Option<SessionId>,
    pub result: ConsensusResult,
}

/// Use case for running multi-agent consensus on a prompt
pub struct RunConsensusUseCase {
    agents: Vec<ActiveAgent>,
    store: Arc<dyn AuditStore>,
    params: OrchestrationParams,
    evaluator: Evaluator,
    aggregator: Aggregator,
}

impl RunConsensusUseCase {
    pub fn new(
        agents: Vec<ActiveAgent>,
        store: Arc<dyn AuditStore>,
        params: OrchestrationParams,
    ) -> Self {
        Self {
            agents,
            store,
            aggregator: Aggregator::new(params.consensus_threshold),
            evaluator: Evaluator::new(),
            params,
        }
    }

    pub fn agents(&self) -> &[ActiveAgent] {
        &self.agents
    }

    pub fn params(&self) -> &OrchestrationParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConsensusInput,
    ) -> Result<RunConsensusOutput, RunConsensusError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunConsensusOutput, RunConsensusError> {
        let agents: Vec<ActiveAgent> = self
            .agents
            .iter()
            .filter(|agent| agent.is_configured())
            .cloned()
            .collect();

        if agents.is_empty() {
            return Err(RunConsensusError::NoAgents);
        }
        if agents.len() < 2 {
            warn!(
                "Only {} agent configured; no cross-evaluation is possible and no winner can emerge",
                agents.len()
            );
        }

        let max_iterations = input
            .max_iterations
            .unwrap_or(self.params.max_iterations)
            .max(1);

        let session_id = match input.session_id {
            Some(id) => Some(id),
            None => self.open_session(&input.prompt),
        };

        info!(
            session = session_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            "Starting consensus with {} agents, up to {} iterations",
            agents.len(),
            max_iterations
        );

        let outcome = self
            .iterate(
                &agents,
                &input.prompt,
                max_iterations,
                session_id.as_ref(),
                progress,
            )
            .await;

        if let Some(id) = &session_id {
            match &outcome {
                Ok(result) => {
                    self.record_status(id, SessionStatus::Completed, result.winner_content())
                }
                Err(_) => self.record_status(id, SessionStatus::Failed, None),
            }
        }

        outcome.map(|result| RunConsensusOutput { session_id, result })
    }

    async fn iterate(
        &self,
        agents: &[ActiveAgent],
        original_prompt: &str,
        max_iterations: usize,
        session_id: Option<&SessionId>,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusResult, RunConsensusError> {
        let mut current_prompt = original_prompt.to_string();
        let mut iteration = 1;

        loop {
            info!(iteration, "Iteration {}/{}", iteration, max_iterations);
            progress.on_iteration_start(iteration, max_iterations);

            let responses = self
                .phase_generation(agents, &current_prompt, progress)
                .await;
            if responses.is_empty() {
                return Err(RunConsensusError::EmptyGeneration { iteration });
            }
            self.record_responses(session_id, iteration, &responses);

            // Critiques always measure fidelity to the original request
            let evaluations = self
                .phase_evaluation(agents, original_prompt, &responses, progress)
                .await;
            self.record_evaluations(session_id, iteration, &evaluations);

            let result = self.aggregator.aggregate(responses, evaluations, iteration);
            progress.on_iteration_complete(&result);

            if result.consensus_reached {
                info!(
                    iteration,
                    winner = result.winner_id().map(|id| id.as_str()).unwrap_or("-"),
                    "Consensus reached"
                );
                return Ok(result);
            }
            if iteration >= max_iterations {
                info!(iteration, "Iteration cap reached without consensus");
                return Ok(result);
            }

            match refinement_feedback(&result) {
                Some(feedback) => {
                    debug!(iteration, "Refining prompt with feedback: {}", feedback);
                    current_prompt = PromptTemplate::refinement_prompt(original_prompt, feedback);
                }
                None => debug!(iteration, "No usable critique; prompt unchanged"),
            }

            iteration += 1;
        }
    }

    /// Generation: every agent answers the current prompt in parallel
    async fn phase_generation(
        &self,
        agents: &[ActiveAgent],
        prompt: &str,
        progress: &dyn ProgressNotifier,
    ) -> Vec<Response> {
        progress.on_phase_start(&Phase::Generation, agents.len());

        let mut join_set = JoinSet::new();

        for (slot, agent) in agents.iter().enumerate() {
            let agent = agent.clone();
            let prompt = prompt.to_string();

            join_set.spawn(async move {
                let result = agent.respond(&prompt).await;
                (slot, agent.id, result)
            });
        }

        // Roster order, regardless of completion order
        let mut slots: Vec<Option<Response>> = vec![None; agents.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, id, Ok(response))) => {
                    info!(agent = %id, "Agent responded");
                    progress.on_task_complete(&Phase::Generation, &id, true);
                    slots[slot] = Some(response);
                }
                Ok((_, id, Err(e))) => {
                    warn!(agent = %id, "Generation failed: {}", e);
                    progress.on_task_complete(&Phase::Generation, &id, false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(&Phase::Generation);
        slots.into_iter().flatten().collect()
    }

    /// Evaluation: every agent critiques every response but its own
    async fn phase_evaluation(
        &self,
        agents: &[ActiveAgent],
        original_prompt: &str,
        responses: &[Response],
        progress: &dyn ProgressNotifier,
    ) -> Vec<Evaluation> {
        let pairs: Vec<(&ActiveAgent, &Response)> = agents
            .iter()
            .flat_map(|evaluator| {
                responses
                    .iter()
                    .filter(move |target| target.agent_id != evaluator.id)
                    .map(move |target| (evaluator, target))
            })
            .collect();

        progress.on_phase_start(&Phase::Evaluation, pairs.len());

        let original: Arc<str> = Arc::from(original_prompt);
        let mut join_set = JoinSet::new();

        for (slot, (evaluator, target)) in pairs.iter().enumerate() {
            let judge = self.evaluator;
            let evaluator = (*evaluator).clone();
            let target = (*target).clone();
            let original = Arc::clone(&original);

            join_set.spawn(async move {
                let evaluation = judge.evaluate(&evaluator, &original, &target).await;
                (slot, evaluation)
            });
        }

        let mut slots: Vec<Option<Evaluation>> = vec![None; pairs.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, evaluation)) => {
                    progress.on_task_complete(
                        &Phase::Evaluation,
                        &evaluation.evaluator_id,
                        !evaluation.fallback,
                    );
                    slots[slot] = Some(evaluation);
                }
                Err(e) => {
                    warn!("Evaluation task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(&Phase::Evaluation);

        // A task that never reported back still owes its pair an evaluation
        slots
            .into_iter()
            .zip(&pairs)
            .map(|(slot, (evaluator, target))| {
                slot.unwrap_or_else(|| {
                    Evaluation::fallback(evaluator.id.clone(), target.agent_id.clone())
                })
            })
            .collect()
    }

    // ==================== Audit Recording ====================

    fn open_session(&self, prompt: &str) -> Option<SessionId> {
        match self.store.create_session(prompt) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to open audit session: {}", e);
                None
            }
        }
    }

    fn record_responses(
        &self,
        session_id: Option<&SessionId>,
        iteration: usize,
        responses: &[Response],
    ) {
        let Some(session_id) = session_id else {
            return;
        };
        for response in responses {
            let record = StoredResponse::from_response(session_id.clone(), iteration, response);
            if let Err(e) = self.store.add_response(record) {
                warn!(agent = %response.agent_id, "Failed to record response: {}", e);
            }
        }
    }

    fn record_evaluations(
        &self,
        session_id: Option<&SessionId>,
        iteration: usize,
        evaluations: &[Evaluation],
    ) {
        let Some(session_id) = session_id else {
            return;
        };
        for evaluation in evaluations {
            let record = StoredEvaluation {
                session_id: session_id.clone(),
                iteration,
                evaluation: evaluation.clone(),
            };
            if let Err(e) = self.store.add_evaluation(record) {
                warn!(
                    evaluator = %evaluation.evaluator_id,
                    target = %evaluation.target_id,
                    "Failed to record evaluation: {}", e
                );
            }
        }
    }

    fn record_status(&self, session_id: &SessionId, status: SessionStatus, result: Option<&str>) {
        if let Err(e) = self.store.update_session_status(session_id, status, result) {
            warn!(session = %session_id, "Failed to update session status: {}", e);
        }
    }
}

/// Critique used to refine the next prompt.
///
/// The lowest-scoring genuine critique of the winner; ties go to the
/// smallest evaluator identity. Fallback evaluations carry no real feedback
/// and are ignored, so `None` is returned when nothing else is left.
fn refinement_feedback(result: &ConsensusResult) -> Option<&str> {
    let winner = result.winner_id()?;

    result
        .evaluations_of(winner)
        .filter(|evaluation| !evaluation.fallback)
        .min_by(|a, b| {
            a.total_score
                .cmp(&b.total_score)
                .then_with(|| a.evaluator_id.cmp(&b.evaluator_id))
        })
        .map(|evaluation| evaluation.feedback.as_str())
}
