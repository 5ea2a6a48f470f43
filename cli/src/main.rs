//! CLI entrypoint for agent-blackboard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use blackboard_application::{Blackboard, RunSessionUseCase};
use blackboard_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, ScenarioLoader, Severity,
};
use blackboard_presentation::{Cli, ConsoleFormatter, OutputFormat, OutputFormatter};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "agent-blackboard.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&cli, config.logging.log_dir.as_deref());

    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(scenario) = cli.scenario.as_deref() else {
        bail!("A scenario file is required. Use --show-config to inspect configuration.");
    };
    let script = ScenarioLoader::load(scenario)?;

    // === Dependency Injection ===
    let mut board = Blackboard::with_config(config.bus_config())
        .with_classifier(config.consensus.classifier());

    let transcript = cli
        .transcript
        .as_deref()
        .or(config.logging.conversation_log.as_deref());
    if let Some(path) = transcript {
        let logger = JsonlConversationLogger::create(path)
            .with_context(|| format!("Could not create transcript {}", path.display()))?;
        info!("Writing transcript to {}", logger.path().display());
        board = board.with_logger(Arc::new(logger));
    }

    let use_case = RunSessionUseCase::new(Arc::new(board));
    let report = use_case.execute(&script).await?;

    let format = cli
        .output
        .or(config.output.format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Summary);
    println!("{}", ConsoleFormatter.render(&report, format));

    Ok(())
}

/// Initialize logging based on verbosity level; diagnostics go to stderr
/// so the report on stdout stays machine-readable.
fn init_logging(cli: &Cli, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace", // -vvv or more
        }
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(file)
        .init();

    guard
}

fn check_config(config: &FileConfig) -> Result<()> {
    let mut errors = Vec::new();
    for issue in config.validate() {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => errors.push(issue.message),
        }
    }
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
