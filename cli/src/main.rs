//! CLI entrypoint for llm-consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use consensus_application::{
    AuditStore, GetSessionDetailsUseCase, NoProgress, ProcessDocumentUseCase, ProgressNotifier,
    RunConsensusInput, RunConsensusUseCase,
};
use consensus_domain::{Chunker, SessionId};
use consensus_infrastructure::{
    AgentFactory, ConfigLoader, FileConfig, InMemoryAuditStore, JsonlAuditStore, StorageBackend,
    TiktokenTokenizer,
};
use consensus_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting llm-consensus");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    check_config(&config)?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let format = config.output.resolve_format(cli.output.map(Into::into));

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    // === Dependency Injection ===
    let store = open_store(&config)?;

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = match command {
        Command::Session { id } => {
            let use_case = GetSessionDetailsUseCase::new(store);
            let details = use_case.execute(&SessionId::new(id))?;
            ConsoleFormatter::format_session(&details, format)
        }

        Command::Consensus {
            prompt,
            max_iterations,
        } => {
            let mut input = RunConsensusInput::new(prompt.clone());
            if let Some(max) = max_iterations {
                if max == 0 {
                    bail!("--max-iterations must be at least 1");
                }
                input = input.with_max_iterations(max);
            }

            let use_case = consensus_use_case(&config, store).await?;
            let result = use_case
                .execute_with_progress(input, progress.as_ref())
                .await?;
            ConsoleFormatter::format_consensus(&prompt, &result, format)
        }

        Command::Process { path, task } => {
            let document = read_document(path.as_ref())?;
            if document.trim().is_empty() {
                bail!("Document is empty");
            }

            let tokenizer = TiktokenTokenizer::new()?;
            let consensus = Arc::new(consensus_use_case(&config, store.clone()).await?);
            let use_case = ProcessDocumentUseCase::new(
                consensus,
                Chunker::new(Arc::new(tokenizer)),
                store,
                config.chunking.to_params(),
            );

            let result = use_case
                .execute_with_progress(&document, &task, progress.as_ref())
                .await?;
            ConsoleFormatter::format_document(&task, &result, format)
        }
    };

    println!("{}", output);

    Ok(())
}

/// Install the stderr subscriber, plus a file layer when `--log-file` is given.
///
/// `RUST_LOG` overrides the level derived from `-v`.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Log warnings and abort on configuration errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let (errors, warnings): (Vec<_>, Vec<_>) =
        config.validate().into_iter().partition(|i| i.is_error());

    for issue in &warnings {
        warn!("Configuration: {}", issue);
    }

    if !errors.is_empty() {
        let details = errors
            .iter()
            .map(|i| format!("  - {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Invalid configuration:\n{}", details);
    }

    Ok(())
}

fn open_store(config: &FileConfig) -> Result<Arc<dyn AuditStore>> {
    let store: Arc<dyn AuditStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryAuditStore::new()),
        StorageBackend::Jsonl => Arc::new(
            JsonlAuditStore::open(&config.storage.path).with_context(|| {
                format!("Could not open audit log {}", config.storage.path)
            })?,
        ),
    };
    Ok(store)
}

async fn consensus_use_case(
    config: &FileConfig,
    store: Arc<dyn AuditStore>,
) -> Result<RunConsensusUseCase> {
    let agents = AgentFactory::from_config(config).await?.agents();
    info!(agents = agents.len(), "Agents ready");

    Ok(RunConsensusUseCase::new(
        agents,
        store,
        config.orchestration.to_params(),
    ))
}

/// Read the document from `path`, or from standard input for `None` / `-`.
fn read_document(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display())),
        _ => {
            let mut document = String::new();
            std::io::stdin()
                .read_to_string(&mut document)
                .context("Could not read standard input")?;
            Ok(document)
        }
    }
}
