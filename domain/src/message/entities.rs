//! Message entity

use super::value_objects::{MessageKind, Priority};
use crate::core::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier of a published message
///
/// Derived from the publisher id, the publish timestamp and a process-wide
/// sequence number, so two messages from the same agent in the same
/// microsecond still get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn derive(publisher: &AgentId, timestamp: &DateTime<Utc>, sequence: u64) -> Self {
        Self(format!(
            "{}_{}_{}",
            publisher,
            timestamp.timestamp_micros(),
            sequence
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One published event on the blackboard (immutable once built)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    timestamp: DateTime<Utc>,
    publisher: AgentId,
    kind: MessageKind,
    topic: String,
    payload: Value,
    priority: Priority,
}

impl Message {
    /// Build a message stamped with the current time
    pub fn new(
        sequence: u64,
        publisher: AgentId,
        kind: MessageKind,
        topic: impl Into<String>,
        payload: Value,
        priority: Priority,
    ) -> Self {
        Self::at(Utc::now(), sequence, publisher, kind, topic, payload, priority)
    }

    /// Build a message with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        sequence: u64,
        publisher: AgentId,
        kind: MessageKind,
        topic: impl Into<String>,
        payload: Value,
        priority: Priority,
    ) -> Self {
        Self {
            id: MessageId::derive(&publisher, &timestamp, sequence),
            timestamp,
            publisher,
            kind,
            topic: topic.into(),
            payload,
            priority,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn publisher(&self) -> &AgentId {
        &self.publisher
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_critical(&self) -> bool {
        self.priority.is_critical()
    }

    /// Payload rendered for humans: strings verbatim, everything else as JSON
    pub fn payload_text(&self) -> String {
        match &self.payload {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
