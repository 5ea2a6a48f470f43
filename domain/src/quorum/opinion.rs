//! Opinion value object

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An agent's current position on a topic
///
/// # Example
///
/// ```
/// use blackboard_domain::quorum::Opinion;
///
/// let opinion = Opinion::new("Community-acquired pneumonia", 0.8).unwrap();
/// assert_eq!(opinion.confidence, 0.8);
///
/// // Out-of-range confidence is clamped, non-finite is rejected
/// assert_eq!(Opinion::new("sepsis", 1.4).unwrap().confidence, 1.0);
/// assert!(Opinion::new("sepsis", f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// Free-text statement of the position
    pub statement: String,
    /// Confidence level (0.0 to 1.0)
    pub confidence: f64,
    /// When the opinion was (last) stated
    pub timestamp: DateTime<Utc>,
}

impl Opinion {
    pub fn new(statement: impl Into<String>, confidence: f64) -> Result<Self, DomainError> {
        if !confidence.is_finite() {
            return Err(DomainError::InvalidConfidence(confidence));
        }
        Ok(Self {
            statement: statement.into(),
            confidence: confidence.clamp(0.0, 1.0),
            timestamp: Utc::now(),
        })
    }
}
