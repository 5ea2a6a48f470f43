//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid topic pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid confidence {0}: must be a finite number")]
    InvalidConfidence(f64),

    #[error("Agent id cannot be empty")]
    EmptyAgentId,

    #[error("Topic cannot be empty")]
    EmptyTopic,
}

impl DomainError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from parsing a subscription pattern
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, DomainError::InvalidPattern { .. })
    }
}
