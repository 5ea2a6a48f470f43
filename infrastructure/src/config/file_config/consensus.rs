//! Consensus configuration from TOML (`[consensus]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [consensus]
//! threshold = 3
//! key_chars = 50
//!
//! [[consensus.categories]]
//! contains = "pneumonia"
//! category = "pneumonia"
//!
//! [[consensus.categories]]
//! contains = "heart"
//! category = "heart failure"
//! ```
//!
//! Without categories, opinions are grouped by the first `key_chars`
//! characters of their lower-cased statement.

use blackboard_domain::quorum::{DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_KEY_CHARS};
use blackboard_domain::{CategoryClassifier, CategoryRule, OpinionClassifier, PrefixClassifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Distinct agents required before consensus is evaluated
    pub threshold: usize,
    /// Characters of the statement used as grouping key
    pub key_chars: usize,
    /// Substring → category rules, first match wins
    pub categories: Vec<CategoryRule>,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONSENSUS_THRESHOLD,
            key_chars: DEFAULT_KEY_CHARS,
            categories: Vec::new(),
        }
    }
}

impl FileConsensusConfig {
    /// Build the classifier described by this section
    pub fn classifier(&self) -> Arc<dyn OpinionClassifier> {
        let prefix = PrefixClassifier::new(self.key_chars);
        if self.categories.is_empty() {
            return Arc::new(prefix);
        }

        // Re-create the rules so `contains` is normalized
        let rules = self
            .categories
            .iter()
            .map(|rule| CategoryRule::new(rule.contains.clone(), rule.category.clone()))
            .collect();
        Arc::new(CategoryClassifier::new(rules).with_fallback(prefix))
    }
}
