//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for session reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full report with the whole conversation
    Full,
    /// Communication counts and consensus only
    Summary,
    /// JSON output
    Json,
}

impl From<blackboard_domain::OutputFormat> for OutputFormat {
    fn from(format: blackboard_domain::OutputFormat) -> Self {
        match format {
            blackboard_domain::OutputFormat::Full => OutputFormat::Full,
            blackboard_domain::OutputFormat::Summary => OutputFormat::Summary,
            blackboard_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for agent-blackboard
#[derive(Parser, Debug)]
#[command(name = "agent-blackboard")]
#[command(author, version, about = "Shared knowledge bus for cooperating analysis agents")]
#[command(long_about = r#"
agent-blackboard replays a scripted analysis session on an in-memory
blackboard: agents subscribe to topic patterns, publish findings and alerts,
ask each other questions and post opinions until consensus forms.

Scenario files are JSON (.json) or TOML (.toml).

Configuration files are loaded from (in priority order):
1. BLACKBOARD_* environment variables
2. --config <path>        Explicit config file
3. ./blackboard.toml      Project-level config
4. ~/.config/agent-blackboard/config.toml   Global config

Example:
  agent-blackboard scenarios/sepsis.toml
  agent-blackboard -o json --transcript session.jsonl scenarios/sepsis.toml
"#)]
pub struct Cli {
    /// Scenario file to run (not required with --show-config)
    pub scenario: Option<PathBuf>,

    /// Output format (defaults to the configured one, then summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the report, no log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a JSONL transcript of the session to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "agent-blackboard",
            "-vv",
            "-o",
            "json",
            "--transcript",
            "out.jsonl",
            "session.toml",
        ])
        .unwrap();

        assert_eq!(cli.scenario, Some(PathBuf::from("session.toml")));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.transcript, Some(PathBuf::from("out.jsonl")));
        assert!(!cli.no_config);
    }

    #[test]
    fn test_show_config_needs_no_scenario() {
        let cli = Cli::try_parse_from(["agent-blackboard", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.scenario.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["agent-blackboard", "-o", "yaml", "s.json"]).is_err());
    }
}
