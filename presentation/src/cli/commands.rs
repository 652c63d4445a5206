//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every response, score and the winner
    Full,
    /// Only the winning answer
    Winner,
    /// JSON output
    Json,
}

impl From<OutputFormat> for consensus_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => consensus_domain::OutputFormat::Full,
            OutputFormat::Winner => consensus_domain::OutputFormat::Winner,
            OutputFormat::Json => consensus_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for llm-consensus
#[derive(Parser, Debug)]
#[command(name = "llm-consensus")]
#[command(author, version, about = "Multiple LLMs answer, grade each other and converge on one answer")]
#[command(long_about = r#"
llm-consensus asks several LLM agents the same question and lets them judge
each other until one answer clears the consensus threshold.

Each iteration has two phases:
1. Generation: every agent answers the prompt in parallel
2. Evaluation: every agent scores every other agent's answer

Documents larger than the direct threshold are split into overlapping token
windows, each window is processed on its own, and the partial results are
merged by a final consensus run.

Configuration files are loaded from (in priority order):
1. LLM_CONSENSUS_* environment variables
2. --config <path>          Explicit config file
3. ./consensus.toml         Project-level config
4. ~/.config/llm-consensus/config.toml   Global config

Example:
  llm-consensus consensus "What's the best way to handle errors in Rust?"
  llm-consensus process report.md --task "Summarize the key findings"
  llm-consensus session 3f2b...
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format [default: from config, otherwise winner]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a consensus round for a prompt
    Consensus {
        /// The prompt every agent answers
        prompt: String,

        /// Override the configured iteration cap
        #[arg(short = 'n', long, value_name = "N")]
        max_iterations: Option<usize>,
    },

    /// Process a document against a task
    Process {
        /// Document to read; standard input when omitted or `-`
        path: Option<PathBuf>,

        /// What to do with the document
        #[arg(short, long)]
        task: String,
    },

    /// Show a stored session
    Session {
        /// Session id printed by an earlier run
        id: String,
    },
}
