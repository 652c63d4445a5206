//! Console output formatter for consensus results

use colored::Colorize;
use consensus_application::{ProcessDocumentOutput, RunConsensusOutput, SessionDetails};
use consensus_domain::{ConsensusResult, MAX_TOTAL_SCORE, OutputFormat};
use serde_json::json;

/// Printed in place of an answer when no winner emerged
pub const NO_WINNER_MESSAGE: &str = "No consensus reached or no result generated.";

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    // ==================== Consensus ====================

    pub fn format_consensus(prompt: &str, output: &RunConsensusOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::consensus_full(prompt, output),
            OutputFormat::Winner => Self::consensus_winner(output),
            OutputFormat::Json => Self::to_json(&json!({
                "session_id": output.session_id,
                "prompt": prompt,
                "result": output.result,
            })),
        }
    }

    fn consensus_full(prompt: &str, output: &RunConsensusOutput) -> String {
        let result = &output.result;
        let mut out = String::new();

        out.push_str(&Self::header("LLM Consensus Results"));
        out.push('\n');

        out.push_str(&format!("{} {}\n\n", "Prompt:".cyan().bold(), prompt));
        out.push_str(&format!(
            "{} {}\n",
            "Agents:".cyan().bold(),
            result
                .responses
                .iter()
                .map(|r| r.agent_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        // Final iteration's responses
        out.push_str(&Self::section_header(&format!(
            "Responses (iteration {})",
            result.iteration_count
        )));
        for response in &result.responses {
            out.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", response.agent_id).yellow().bold(),
                response.content
            ));
        }

        if !result.evaluations.is_empty() {
            out.push_str(&Self::section_header("Evaluations"));
            for evaluation in &result.evaluations {
                let title = format!(
                    "── {} → {}: {}/{} ──",
                    evaluation.evaluator_id,
                    evaluation.target_id,
                    evaluation.total_score,
                    MAX_TOTAL_SCORE
                );
                let title = if evaluation.fallback {
                    title.red().bold()
                } else {
                    title.yellow().bold()
                };
                out.push_str(&format!("\n{}\n{}\n", title, evaluation.feedback));
            }
        }

        if !result.standings.is_empty() {
            out.push_str(&Self::section_header("Standings"));
            for (rank, standing) in result.standings.iter().enumerate() {
                out.push_str(&format!(
                    "  {}. {}  {:.1}/{} ({:.2}, {} evaluations)\n",
                    rank + 1,
                    standing.agent_id,
                    standing.mean_score,
                    MAX_TOTAL_SCORE,
                    standing.normalized(),
                    standing.evaluation_count
                ));
            }
        }

        out.push_str(&Self::section_header("Result"));
        out.push_str(&Self::summary(result));
        match &result.winner {
            Some(winner) => out.push_str(&format!(
                "\n{}\n\n{}\n",
                format!("Winner: {}", winner.agent_id).green().bold(),
                winner.content
            )),
            None => out.push_str(&format!("\n{}\n", NO_WINNER_MESSAGE.yellow())),
        }

        if let Some(id) = &output.session_id {
            out.push_str(&format!("\n{} {}\n", "Session:".dimmed(), id));
        }
        out.push_str(&Self::footer());

        out
    }

    fn consensus_winner(output: &RunConsensusOutput) -> String {
        let result = &output.result;
        let mut out = String::new();

        out.push_str(result.winner_content().unwrap_or(NO_WINNER_MESSAGE));
        out.push_str("\n\n");
        out.push_str(&format!("{}\n", "--- Consensus Details ---".dimmed()));
        out.push_str(&Self::summary(result));
        out.push_str(&format!(
            "Winner: {}\n",
            result
                .winner_id()
                .map(|id| id.as_str())
                .unwrap_or("none")
        ));
        if let Some(id) = &output.session_id {
            out.push_str(&format!("Session: {}\n", id));
        }

        out
    }

    fn summary(result: &ConsensusResult) -> String {
        let mut out = format!(
            "Iterations: {}\nConsensus Reached: {}\n",
            result.iteration_count, result.consensus_reached
        );
        if let Some(score) = result.best_normalized_score() {
            out.push_str(&format!("Best Score: {:.2}\n", score));
        }
        out
    }

    // ==================== Documents ====================

    pub fn format_document(task: &str, output: &ProcessDocumentOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&json!({
                "session_id": output.session_id,
                "task": task,
                "chunk_count": output.chunk_count,
                "content": output.content,
            })),
            OutputFormat::Winner => format!("{}\n", output.content),
            OutputFormat::Full => {
                let mut out = String::new();
                out.push_str(&Self::header("Document Processing Result"));
                out.push('\n');
                out.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task));
                let mode = match output.chunk_count {
                    0 => "processed directly".to_string(),
                    n => format!("map-reduce over {} chunks", n),
                };
                out.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), mode));
                if let Some(id) = &output.session_id {
                    out.push_str(&format!("{} {}\n", "Session:".cyan().bold(), id));
                }
                out.push_str(&Self::section_header("Output"));
                out.push_str(&format!("\n{}\n", output.content));
                out.push_str(&Self::footer());
                out
            }
        }
    }

    // ==================== Sessions ====================

    pub fn format_session(details: &SessionDetails, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(details);
        }

        let session = &details.session;
        let mut out = String::new();

        out.push_str(&Self::header(&format!("Session {}", session.id)));
        out.push('\n');
        out.push_str(&format!("{} {}\n", "Status:".cyan().bold(), session.status));
        out.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), session.prompt));
        out.push_str(&format!("{} {}\n", "Created:".cyan().bold(), session.created_at));
        if let Some(completed) = &session.completed_at {
            out.push_str(&format!("{} {}\n", "Completed:".cyan().bold(), completed));
        }
        out.push_str(&format!(
            "{} {} responses, {} evaluations, {} chunks\n",
            "Records:".cyan().bold(),
            details.response_count,
            details.evaluation_count,
            details.chunk_count
        ));

        if !details.responses.is_empty() {
            out.push_str(&Self::section_header("Responses"));
            for response in &details.responses {
                out.push_str(&format!(
                    "  [{}] {}: {}\n",
                    response.iteration,
                    response.agent_id.to_string().yellow(),
                    response.content_preview
                ));
            }
        }

        out.push_str(&Self::section_header("Best Response"));
        out.push_str(&format!(
            "\n{}\n",
            details.best_response.as_deref().unwrap_or(NO_WINNER_MESSAGE)
        ));
        out.push_str(&Self::footer());

        out
    }

    // ==================== Helpers ====================

    fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
