//! Message value objects: kind and priority

use serde::{Deserialize, Serialize};

/// What a published message represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// An analysis result shared with other agents
    Finding,
    /// A question posted through the correlator
    Question,
    /// An answer to a previously asked question
    Response,
    /// Something other agents must react to
    Alert,
    /// A consensus announcement
    Consensus,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Finding => "finding",
            MessageKind::Question => "question",
            MessageKind::Response => "response",
            MessageKind::Alert => "alert",
            MessageKind::Consensus => "consensus",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "finding" => Ok(MessageKind::Finding),
            "question" => Ok(MessageKind::Question),
            "response" => Ok(MessageKind::Response),
            "alert" => Ok(MessageKind::Alert),
            "consensus" => Ok(MessageKind::Consensus),
            _ => Err(format!(
                "Unknown message kind: {}. Valid: finding, question, response, alert, consensus",
                s
            )),
        }
    }
}

/// Urgency of a message
///
/// Ordered so that `Critical > High > Normal > Low`. Only `Critical` has a
/// side effect on the bus (it is indexed as an alert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Numeric level as used by the clinical tooling (1 = most urgent)
    pub fn level(&self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Priority::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lower level number means more urgent
        other.level().cmp(&self.level())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(format!(
                "Unknown priority: {}. Valid: critical, high, normal, low",
                s
            )),
        }
    }
}
