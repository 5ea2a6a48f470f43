//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// conversation_log = "transcripts/session.jsonl"
/// log_dir = "~/.local/state/agent-blackboard"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every published message and consensus evaluation
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic log files
    pub log_dir: Option<PathBuf>,
}
