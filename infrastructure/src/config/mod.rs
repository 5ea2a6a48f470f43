//! Configuration file loading for agent-blackboard
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BLACKBOARD_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./blackboard.toml` or `./.blackboard.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agent-blackboard/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, FileBusConfig, FileConfig, FileConsensusConfig,
    FileLoggingConfig, FileOutputConfig, Severity,
};
pub use loader::ConfigLoader;
