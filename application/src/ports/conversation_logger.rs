//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording blackboard traffic
//! (published messages, consensus evaluations, session resets) to a
//! structured transcript used for audit and debate replay.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the conversation in
//! a machine-readable format (JSONL).

use blackboard_domain::{ConsensusRecord, Message};
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message", "consensus").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A message was published on the bus
    pub fn published(message: &Message) -> Self {
        Self::new(
            "message",
            json!({
                "id": message.id(),
                "published_at": message.timestamp(),
                "agent_id": message.publisher(),
                "message_type": message.kind(),
                "topic": message.topic(),
                "content": message.payload(),
                "priority": message.priority(),
            }),
        )
    }

    /// Consensus was (re-)evaluated for a topic
    pub fn consensus(record: &ConsensusRecord) -> Self {
        Self::new(
            "consensus",
            serde_json::to_value(record).unwrap_or(Value::Null),
        )
    }

    /// The bus was reset for a new session
    pub fn cleared() -> Self {
        Self::new("session_cleared", json!({}))
    }
}

/// Port for logging conversation events to a structured log.
///
/// The `log` method is synchronous and non-fallible so a broken transcript
/// never disrupts dispatch.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
