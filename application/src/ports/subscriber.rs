//! Subscriber port
//!
//! Agents receive blackboard traffic by implementing [`Subscriber`] and
//! registering it with [`Blackboard::subscribe`](crate::Blackboard::subscribe)
//! for one or more topic patterns.
//!
//! # Delivery contract
//!
//! - Handlers are invoked one at a time, in subscription order
//! - A handler never sees a message its own agent published
//! - A failing handler does not stop delivery to the others; its error is
//!   reported back to the publisher in the publish outcome
//!
//! Handlers may call back into the bus (publish, ask, respond, opine). A
//! publish issued from inside a handler is fully delivered before the
//! outer dispatch resumes.

use async_trait::async_trait;
use blackboard_domain::Message;
use thiserror::Error;

/// Error returned by a subscriber that could not handle a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Unexpected payload on {topic}: {reason}")]
    InvalidPayload { topic: String, reason: String },
}

impl SubscriberError {
    pub fn failed(reason: impl Into<String>) -> Self {
        SubscriberError::Failed(reason.into())
    }
}

/// Port implemented by every agent that listens on the blackboard
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Handle a message routed to this agent
    async fn on_message(&self, topic: &str, message: &Message) -> Result<(), SubscriberError>;
}
