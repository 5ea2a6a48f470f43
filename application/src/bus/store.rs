//! Append-only stores behind the blackboard: topic histories, the global
//! conversation log and the critical alert index.
//!
//! All three hold the same `Arc<Message>`; nothing is removed except by
//! `clear`.

use blackboard_domain::{AgentId, Message};
use std::collections::HashMap;
use std::sync::Arc;

/// Topic → ordered message history
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    topics: HashMap<String, Vec<Arc<Message>>>,
}

impl KnowledgeStore {
    pub fn append(&mut self, message: Arc<Message>) {
        self.topics
            .entry(message.topic().to_string())
            .or_default()
            .push(message);
    }

    /// Most recently appended message for the exact topic
    pub fn latest(&self, topic: &str) -> Option<Arc<Message>> {
        self.topics.get(topic).and_then(|h| h.last()).cloned()
    }

    /// Full history of the exact topic, oldest first
    pub fn all(&self, topic: &str) -> Vec<Arc<Message>> {
        self.topics.get(topic).cloned().unwrap_or_default()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

/// Every published message in publish order
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Arc<Message>>,
}

impl ConversationLog {
    pub fn append(&mut self, message: Arc<Message>) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Arc<Message>] {
        &self.messages
    }

    pub fn by_agent(&self, agent: &AgentId) -> Vec<Arc<Message>> {
        self.messages
            .iter()
            .filter(|m| m.publisher() == agent)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Index of CRITICAL messages in publish order
#[derive(Debug, Default)]
pub struct AlertRegistry {
    alerts: Vec<Arc<Message>>,
}

impl AlertRegistry {
    /// Index the message if it is critical; returns whether it was recorded
    pub fn record_if_critical(&mut self, message: &Arc<Message>) -> bool {
        if message.is_critical() {
            self.alerts.push(Arc::clone(message));
            true
        } else {
            false
        }
    }

    /// Whether any recorded alert has exactly this topic
    pub fn has_alert(&self, topic: &str) -> bool {
        self.alerts.iter().any(|a| a.topic() == topic)
    }

    pub fn alerts(&self) -> &[Arc<Message>] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackboard_domain::{MessageKind, Priority};
    use serde_json::json;

    fn message(seq: u64, agent: &str, topic: &str, priority: Priority) -> Arc<Message> {
        Arc::new(Message::new(
            seq,
            agent.into(),
            MessageKind::Finding,
            topic,
            json!(seq),
            priority,
        ))
    }

    #[test]
    fn test_latest_returns_most_recent() {
        let mut store = KnowledgeStore::default();
        assert!(store.latest("lab_complete").is_none());

        for seq in 1..=3 {
            store.append(message(seq, "Lab", "lab_complete", Priority::Normal));
        }
        assert_eq!(store.latest("lab_complete").unwrap().payload(), &json!(3));
        assert_eq!(store.all("lab_complete").len(), 3);
        assert!(store.all("lab_").is_empty());
    }

    #[test]
    fn test_topics_are_exact() {
        let mut store = KnowledgeStore::default();
        store.append(message(1, "Lab", "lab_complete", Priority::Normal));
        assert!(store.latest("lab").is_none());
        assert_eq!(store.topic_count(), 1);
    }

    #[test]
    fn test_conversation_log_filters_by_agent() {
        let mut log = ConversationLog::default();
        log.append(message(1, "Lab", "a", Priority::Normal));
        log.append(message(2, "Imaging", "b", Priority::Normal));
        log.append(message(3, "Lab", "c", Priority::Normal));

        let lab = log.by_agent(&"Lab".into());
        assert_eq!(lab.len(), 2);
        assert_eq!(lab[1].topic(), "c");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_alert_registry_only_records_critical() {
        let mut alerts = AlertRegistry::default();
        assert!(!alerts.record_if_critical(&message(1, "Lab", "x", Priority::High)));
        assert!(alerts.record_if_critical(&message(2, "Lab", "critical_x", Priority::Critical)));

        assert!(alerts.has_alert("critical_x"));
        assert!(!alerts.has_alert("x"));
        assert_eq!(alerts.len(), 1);

        alerts.clear();
        assert!(alerts.is_empty());
    }
}
