//! Session-level reporting values

use crate::message::{Message, MessageKind};
use serde::{Deserialize, Serialize};

/// Maximum number of highlights kept for a session report
pub const MAX_HIGHLIGHTS: usize = 15;

/// Communication counters for one analysis session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_messages: usize,
    pub critical_alerts: usize,
    pub questions_asked: usize,
    pub consensus_topics: usize,
}

/// A notable moment in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Highlight {
    CriticalAlert { agent: String, topic: String },
    Question { agent: String, question: String },
    Consensus { topic: String },
}

impl Highlight {
    /// Classify a message as a highlight, if it is one
    pub fn from_message(message: &Message) -> Option<Self> {
        match message.kind() {
            MessageKind::Alert if message.is_critical() => Some(Highlight::CriticalAlert {
                agent: message.publisher().to_string(),
                topic: message.topic().to_string(),
            }),
            MessageKind::Question => Some(Highlight::Question {
                agent: message.publisher().to_string(),
                question: message.payload_text(),
            }),
            MessageKind::Consensus => Some(Highlight::Consensus {
                topic: message.topic().to_string(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for Highlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Highlight::CriticalAlert { agent, topic } => write!(f, "ALERT {}: {}", agent, topic),
            Highlight::Question { agent, question } => write!(f, "{} asked: {}", agent, question),
            Highlight::Consensus { topic } => write!(f, "Consensus reached on {}", topic),
        }
    }
}

/// The last [`MAX_HIGHLIGHTS`] highlights of a conversation, oldest first
pub fn extract_highlights<'a>(conversation: impl IntoIterator<Item = &'a Message>) -> Vec<Highlight> {
    let all: Vec<Highlight> = conversation
        .into_iter()
        .filter_map(Highlight::from_message)
        .collect();
    let skip = all.len().saturating_sub(MAX_HIGHLIGHTS);
    all.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Priority;
    use serde_json::json;

    fn message(kind: MessageKind, topic: &str, priority: Priority) -> Message {
        Message::new(1, "Agent".into(), kind, topic, json!("text"), priority)
    }

    #[test]
    fn test_only_critical_alerts_are_highlighted() {
        assert!(Highlight::from_message(&message(MessageKind::Alert, "a", Priority::High)).is_none());
        assert_eq!(
            Highlight::from_message(&message(MessageKind::Alert, "a", Priority::Critical)),
            Some(Highlight::CriticalAlert {
                agent: "Agent".to_string(),
                topic: "a".to_string()
            })
        );
    }

    #[test]
    fn test_findings_are_skipped() {
        let log = vec![
            message(MessageKind::Finding, "lab", Priority::Normal),
            message(MessageKind::Question, "question_1", Priority::Normal),
            message(MessageKind::Consensus, "diagnosis", Priority::Normal),
        ];
        let highlights = extract_highlights(&log);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].to_string(), "Agent asked: text");
        assert_eq!(highlights[1].to_string(), "Consensus reached on diagnosis");
    }

    #[test]
    fn test_keeps_last_fifteen() {
        let log: Vec<_> = (0..20)
            .map(|i| message(MessageKind::Consensus, &format!("t{}", i), Priority::Normal))
            .collect();
        let highlights = extract_highlights(&log);
        assert_eq!(highlights.len(), MAX_HIGHLIGHTS);
        assert_eq!(highlights[0], Highlight::Consensus { topic: "t5".to_string() });
    }
}
