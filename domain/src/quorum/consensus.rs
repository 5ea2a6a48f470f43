//! Confidence-weighted consensus over the opinion ledger
//!
//! Opinions are grouped by classifier key, each group's confidences are
//! summed, and the heaviest group wins. The consensus confidence divides the
//! winning sum by the number of opinions on the topic, so dissent dilutes it.

use super::classifier::OpinionClassifier;
use super::ledger::TopicOpinions;
use crate::core::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Distinct agents needed before a topic is evaluated
pub const DEFAULT_CONSENSUS_THRESHOLD: usize = 3;

/// Where a topic stands on its way to consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusState {
    /// Nobody has opined yet
    NoOpinions,
    /// Some agents have opined, but fewer than the threshold
    Accumulating(usize),
    /// Threshold reached; re-evaluated on every further post
    Evaluated,
}

impl ConsensusState {
    pub fn for_count(count: usize, threshold: usize) -> Self {
        match count {
            0 => ConsensusState::NoOpinions,
            n if n < threshold => ConsensusState::Accumulating(n),
            _ => ConsensusState::Evaluated,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, ConsensusState::Evaluated)
    }
}

impl std::fmt::Display for ConsensusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusState::NoOpinions => write!(f, "No opinions"),
            ConsensusState::Accumulating(n) => write!(f, "Accumulating ({})", n),
            ConsensusState::Evaluated => write!(f, "Evaluated"),
        }
    }
}

/// The verdict for one topic
///
/// # Example
///
/// ```
/// use blackboard_domain::quorum::{ConsensusEngine, Opinion, OpinionLedger};
///
/// let mut ledger = OpinionLedger::new();
/// ledger.post("diagnosis", "A".into(), Opinion::new("pneumonia", 0.8).unwrap());
/// ledger.post("diagnosis", "B".into(), Opinion::new("pneumonia", 0.7).unwrap());
/// ledger.post("diagnosis", "C".into(), Opinion::new("sepsis", 0.9).unwrap());
///
/// let engine = ConsensusEngine::default();
/// let record = engine.evaluate("diagnosis", ledger.topic("diagnosis").unwrap()).unwrap();
/// assert_eq!(record.consensus, "pneumonia");
/// assert!((record.confidence - 0.5).abs() < 1e-9);
/// assert_eq!(record.dissenting_groups, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub topic: String,
    /// Winning group key
    pub consensus: String,
    /// Agents in the winning group, in first-post order
    pub supporting_agents: Vec<AgentId>,
    /// Winning confidence sum divided by the number of opinions
    pub confidence: f64,
    /// Number of groups other than the winner
    pub dissenting_groups: usize,
    /// Opinions considered in this evaluation
    pub opinion_count: usize,
    pub evaluated_at: DateTime<Utc>,
}

impl ConsensusRecord {
    pub fn is_unanimous(&self) -> bool {
        self.dissenting_groups == 0
    }
}

struct OpinionGroup<'a> {
    key: String,
    members: Vec<&'a AgentId>,
    confidence_sum: f64,
}

/// Evaluates consensus with a pluggable classifier
#[derive(Clone)]
pub struct ConsensusEngine {
    threshold: usize,
    classifier: Arc<dyn OpinionClassifier>,
}

impl ConsensusEngine {
    pub fn new(threshold: usize, classifier: Arc<dyn OpinionClassifier>) -> Self {
        Self {
            threshold: threshold.max(1),
            classifier,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold.max(1);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn OpinionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Whether `count` distinct opinions are enough to evaluate
    pub fn is_ready(&self, count: usize) -> bool {
        count >= self.threshold
    }

    pub fn state_for(&self, count: usize) -> ConsensusState {
        ConsensusState::for_count(count, self.threshold)
    }

    /// Compute the verdict for a topic from scratch
    ///
    /// Returns `None` only when there are no opinions; the threshold check
    /// is the caller's concern (see [`ConsensusEngine::is_ready`]).
    pub fn evaluate(&self, topic: &str, opinions: &TopicOpinions) -> Option<ConsensusRecord> {
        let mut groups: Vec<OpinionGroup<'_>> = Vec::new();

        for (agent, opinion) in opinions.iter() {
            let key = self.classifier.classify(&opinion.statement);
            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => {
                    group.members.push(agent);
                    group.confidence_sum += opinion.confidence;
                }
                None => groups.push(OpinionGroup {
                    key,
                    members: vec![agent],
                    confidence_sum: opinion.confidence,
                }),
            }
        }

        // Strict comparison keeps the earliest-formed group on ties
        let mut winner: Option<&OpinionGroup<'_>> = None;
        for group in &groups {
            if winner.is_none_or(|best| group.confidence_sum > best.confidence_sum) {
                winner = Some(group);
            }
        }
        let winner = winner?;

        let opinion_count = opinions.len();
        Some(ConsensusRecord {
            topic: topic.to_string(),
            consensus: winner.key.clone(),
            supporting_agents: winner.members.iter().map(|a| (*a).clone()).collect(),
            confidence: winner.confidence_sum / opinion_count as f64,
            dissenting_groups: groups.len() - 1,
            opinion_count,
            evaluated_at: Utc::now(),
        })
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONSENSUS_THRESHOLD,
            Arc::new(super::classifier::PrefixClassifier::default()),
        )
    }
}

impl std::fmt::Debug for ConsensusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsensusEngine")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}
