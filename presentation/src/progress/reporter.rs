//! Progress reporting for consensus runs

use colored::Colorize;
use consensus_application::ProgressNotifier;
use consensus_domain::{AgentId, ConsensusResult, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a run with progress bars on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    map_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            map_bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::Generation => "Generation",
            Phase::Evaluation => "Evaluation",
        }
    }

    fn new_bar(&self, len: usize, prefix: String) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(prefix);
        pb.set_message("Starting...");
        pb
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        self.println(format!(
            "{} {}",
            "->".cyan(),
            format!("Iteration {}/{}", iteration, max_iterations).bold()
        ));
    }

    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.new_bar(total_tasks, Self::phase_display_name(phase).to_string());
        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, agent: &AgentId, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!(
                "{} complete!",
                Self::phase_display_name(phase).green()
            ));
        }
    }

    fn on_iteration_complete(&self, result: &ConsensusResult) {
        let line = match (result.winner_id(), result.best_normalized_score()) {
            (Some(winner), Some(score)) if result.consensus_reached => format!(
                "   {} consensus on {} ({:.2})",
                "v".green(),
                winner,
                score
            ),
            (Some(winner), Some(score)) => format!(
                "   {} best so far {} ({:.2}), below threshold",
                "~".yellow(),
                winner,
                score
            ),
            _ => format!("   {} no winner this iteration", "x".red()),
        };
        self.println(line);
    }

    fn on_map_start(&self, total_chunks: usize) {
        let pb = self.new_bar(total_chunks, "Chunks".to_string());
        if let Ok(mut slot) = self.map_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_chunk_complete(&self, index: usize, success: bool) {
        if let Ok(slot) = self.map_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} part {}", "v".green(), index + 1)
            } else {
                format!("{} part {}", "x".red(), index + 1)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_reduce_start(&self) {
        if let Ok(mut slot) = self.map_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{}", "Map complete!".green()));
        }
        self.println(format!("{} {}", "->".cyan(), "Combining partial results".bold()));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            format!("Iteration {}/{}", iteration, max_iterations).bold()
        );
    }

    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "  {} ({} tasks)",
            ProgressReporter::phase_display_name(phase).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, agent: &AgentId, success: bool) {
        if success {
            eprintln!("    {} {}", "v".green(), agent);
        } else {
            eprintln!("    {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_iteration_complete(&self, result: &ConsensusResult) {
        match result.winner_id() {
            Some(winner) => eprintln!(
                "  winner {} (consensus: {})",
                winner, result.consensus_reached
            ),
            None => eprintln!("  no winner"),
        }
    }

    fn on_map_start(&self, total_chunks: usize) {
        eprintln!("{} {} chunks", "->".cyan(), total_chunks);
    }

    fn on_chunk_complete(&self, index: usize, success: bool) {
        if success {
            eprintln!("  {} part {}", "v".green(), index + 1);
        } else {
            eprintln!("  {} part {} (failed)", "x".red(), index + 1);
        }
    }

    fn on_reduce_start(&self) {
        eprintln!("{} Combining partial results", "->".cyan());
    }
}
