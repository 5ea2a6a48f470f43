//! Pending question entities

use crate::core::agent::AgentId;
use crate::topic::QUESTION_TOPIC_PREFIX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a question, minted from a monotonically increasing
/// counter and never reused for the lifetime of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Topic the question and its responses are published on
    pub fn topic(&self) -> String {
        format!("{}{}", QUESTION_TOPIC_PREFIX, self.0)
    }

    /// Recover the id from a `question_<n>` topic
    pub fn from_topic(topic: &str) -> Option<Self> {
        topic
            .strip_prefix(QUESTION_TOPIC_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.topic())
    }
}

/// Who a question is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionTargets {
    /// Every subscriber of the question topic
    #[default]
    All,
    /// An explicit list of agents
    Agents(Vec<AgentId>),
}

impl QuestionTargets {
    pub fn from_list(agents: Option<Vec<AgentId>>) -> Self {
        match agents {
            Some(list) if !list.is_empty() => QuestionTargets::Agents(list),
            _ => QuestionTargets::All,
        }
    }

    pub fn includes(&self, agent: &AgentId) -> bool {
        match self {
            QuestionTargets::All => true,
            QuestionTargets::Agents(list) => list.contains(agent),
        }
    }
}

/// One answer appended to a pending question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub agent: AgentId,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// A question asked on the blackboard together with the answers so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub id: QuestionId,
    pub question: String,
    pub asking_agent: AgentId,
    pub targets: QuestionTargets,
    pub responses: Vec<QuestionResponse>,
    pub asked_at: DateTime<Utc>,
}

impl PendingQuestion {
    pub fn new(
        id: QuestionId,
        asking_agent: AgentId,
        question: impl Into<String>,
        targets: QuestionTargets,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            asking_agent,
            targets,
            responses: Vec::new(),
            asked_at: Utc::now(),
        }
    }

    pub fn topic(&self) -> String {
        self.id.topic()
    }

    pub fn add_response(&mut self, agent: AgentId, response: impl Into<String>) {
        self.responses.push(QuestionResponse {
            agent,
            response: response.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn is_answered(&self) -> bool {
        !self.responses.is_empty()
    }
}
