//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod bus;
mod consensus;
mod logging;
mod output;

pub use bus::FileBusConfig;
pub use consensus::FileConsensusConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use blackboard_application::BusConfig;
use serde::{Deserialize, Serialize};

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work as written.
    Error,
    /// The configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `consensus.threshold` is 0
    ZeroThreshold,
    /// `consensus.key_chars` is 0: every statement would share one group
    ZeroKeyChars,
    /// A category rule with an empty `contains` or `category`
    EmptyCategory { index: usize },
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Dispatch settings
    pub bus: FileBusConfig,
    /// Consensus threshold and opinion grouping
    pub consensus: FileConsensusConfig,
    /// Transcript and diagnostic log locations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.consensus.threshold == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::ZeroThreshold,
                message: "consensus.threshold is 0, treating it as 1".to_string(),
            });
        }

        if self.consensus.key_chars == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ZeroKeyChars,
                message: "consensus.key_chars is 0, all opinions would fall into one group"
                    .to_string(),
            });
        }

        for (index, rule) in self.consensus.categories.iter().enumerate() {
            if rule.contains.trim().is_empty() || rule.category.trim().is_empty() {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::EmptyCategory { index },
                    message: format!(
                        "consensus.categories[{}]: both 'contains' and 'category' must be set",
                        index
                    ),
                });
            }
        }

        issues
    }

    /// Bus settings for the application layer
    pub fn bus_config(&self) -> BusConfig {
        BusConfig::default()
            .with_handler_timeout_ms(self.bus.handler_timeout_ms)
            .with_consensus_threshold(self.consensus.threshold)
            .with_opinion_key_chars(self.consensus.key_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackboard_domain::{CategoryRule, OutputFormat};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[bus]
handler_timeout_ms = 1500

[consensus]
threshold = 4
key_chars = 30

[[consensus.categories]]
contains = "sepsis"
category = "sepsis"

[logging]
conversation_log = "session.jsonl"

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bus.handler_timeout_ms, Some(1500));
        assert_eq!(config.consensus.threshold, 4);
        assert_eq!(config.consensus.key_chars, 30);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.bus.handler_timeout_ms.is_none());
        assert_eq!(config.consensus.threshold, 3);
        assert!(config.logging.conversation_log.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.consensus.threshold = 0;
        config.consensus.key_chars = 0;
        config.consensus.categories = vec![
            CategoryRule::new("pneumonia", "pneumonia"),
            CategoryRule::new("", "nothing"),
        ];

        let codes: Vec<_> = config.validate().into_iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::ZeroThreshold,
                ConfigIssueCode::ZeroKeyChars,
                ConfigIssueCode::EmptyCategory { index: 1 },
            ]
        );
    }

    #[test]
    fn test_bus_config_conversion() {
        let mut config = FileConfig::default();
        config.bus.handler_timeout_ms = Some(200);
        config.consensus.threshold = 2;

        let bus = config.bus_config();
        assert_eq!(bus.handler_timeout, Some(Duration::from_millis(200)));
        assert_eq!(bus.consensus_threshold, 2);
        assert_eq!(bus.opinion_key_chars, 50);

        config.bus.handler_timeout_ms = Some(0);
        assert!(config.bus_config().handler_timeout.is_none());
    }
}
