//! Bus and delivery errors

use crate::ports::subscriber::SubscriberError;
use blackboard_domain::DomainError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by blackboard operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BusError {
    #[error("Invalid subscription for {agent}: {source}")]
    Pattern {
        agent: String,
        #[source]
        source: DomainError,
    },

    #[error("No pending question for topic '{0}'")]
    UnknownQuestion(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Why a single subscriber did not handle a message
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error(transparent)]
    Handler(#[from] SubscriberError),

    #[error("Handler panicked: {0}")]
    Panicked(String),

    #[error("Handler timed out after {0:?}")]
    TimedOut(Duration),
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeliveryError::TimedOut(_))
    }
}
