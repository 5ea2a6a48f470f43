//! Opinion ledger: the latest opinion of every agent, per topic

use super::opinion::Opinion;
use crate::core::agent::AgentId;
use std::collections::BTreeMap;

/// Opinions on a single topic in first-post order
///
/// Re-posting overwrites the agent's entry in place, so the position of an
/// agent is fixed by its first opinion on the topic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicOpinions {
    entries: Vec<(AgentId, Opinion)>,
}

impl TopicOpinions {
    /// Insert or overwrite; returns true when the agent is new to the topic
    pub fn upsert(&mut self, agent: AgentId, opinion: Opinion) -> bool {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(a, _)| *a == agent) {
            *existing = opinion;
            false
        } else {
            self.entries.push((agent, opinion));
            true
        }
    }

    pub fn get(&self, agent: &AgentId) -> Option<&Opinion> {
        self.entries
            .iter()
            .find(|(a, _)| a == agent)
            .map(|(_, opinion)| opinion)
    }

    /// Number of distinct agents with an opinion
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &Opinion)> {
        self.entries.iter().map(|(agent, opinion)| (agent, opinion))
    }

    pub fn entries(&self) -> &[(AgentId, Opinion)] {
        &self.entries
    }
}

/// Per-topic opinion ledger
#[derive(Debug, Clone, Default)]
pub struct OpinionLedger {
    topics: BTreeMap<String, TopicOpinions>,
}

impl OpinionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an opinion; returns the number of distinct agents on the topic
    pub fn post(&mut self, topic: &str, agent: AgentId, opinion: Opinion) -> usize {
        let opinions = self.topics.entry(topic.to_string()).or_default();
        opinions.upsert(agent, opinion);
        opinions.len()
    }

    pub fn topic(&self, topic: &str) -> Option<&TopicOpinions> {
        self.topics.get(topic)
    }

    /// Number of distinct agents with an opinion on `topic`
    pub fn count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(TopicOpinions::len).unwrap_or(0)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opinion(statement: &str, confidence: f64) -> Opinion {
        Opinion::new(statement, confidence).unwrap()
    }

    #[test]
    fn test_repost_overwrites() {
        let mut ledger = OpinionLedger::new();
        assert_eq!(ledger.post("diagnosis", "A".into(), opinion("pneumonia", 0.6)), 1);
        assert_eq!(ledger.post("diagnosis", "A".into(), opinion("sepsis", 0.9)), 1);

        let topic = ledger.topic("diagnosis").unwrap();
        assert_eq!(topic.len(), 1);
        assert_eq!(topic.get(&"A".into()).unwrap().statement, "sepsis");
    }

    #[test]
    fn test_repost_keeps_first_position() {
        let mut ledger = OpinionLedger::new();
        ledger.post("dx", "A".into(), opinion("x", 0.1));
        ledger.post("dx", "B".into(), opinion("y", 0.2));
        ledger.post("dx", "A".into(), opinion("z", 0.3));

        let agents: Vec<_> = ledger
            .topic("dx")
            .unwrap()
            .iter()
            .map(|(agent, _)| agent.as_str().to_string())
            .collect();
        assert_eq!(agents, vec!["A", "B"]);
    }

    #[test]
    fn test_topics_are_independent() {
        let mut ledger = OpinionLedger::new();
        ledger.post("diagnosis", "A".into(), opinion("x", 0.5));
        ledger.post("disposition", "A".into(), opinion("admit", 0.5));
        assert_eq!(ledger.count("diagnosis"), 1);
        assert_eq!(ledger.count("disposition"), 1);
        assert_eq!(ledger.count("treatment"), 0);
    }

    #[test]
    fn test_clear() {
        let mut ledger = OpinionLedger::new();
        ledger.post("diagnosis", "A".into(), opinion("x", 0.5));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.topic("diagnosis").is_none());
    }
}
