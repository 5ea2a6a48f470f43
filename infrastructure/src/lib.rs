//! Infrastructure layer for agent-blackboard
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, configuration file loading, and scenario file parsing.

pub mod config;
pub mod logging;
pub mod scenario;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use logging::JsonlConversationLogger;
pub use scenario::{ScenarioError, ScenarioFormat, ScenarioLoader};
