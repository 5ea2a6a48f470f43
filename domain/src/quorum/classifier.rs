//! Opinion classifiers
//!
//! A classifier maps a free-text statement to the key used to group
//! "the same" opinion during consensus. Two implementations ship:
//!
//! - [`PrefixClassifier`]: lower-cased first N characters (N = 50 by default)
//! - [`CategoryClassifier`]: named categories matched by substring, falling
//!   back to a prefix key

use crate::core::string::first_chars;
use serde::{Deserialize, Serialize};

/// Number of characters kept by the default prefix key
pub const DEFAULT_KEY_CHARS: usize = 50;

/// Maps a statement to its grouping key
pub trait OpinionClassifier: Send + Sync {
    fn classify(&self, statement: &str) -> String;
}

/// Groups statements sharing the same lower-cased leading characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixClassifier {
    key_chars: usize,
}

impl PrefixClassifier {
    pub fn new(key_chars: usize) -> Self {
        Self { key_chars }
    }

    pub fn key_chars(&self) -> usize {
        self.key_chars
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_CHARS)
    }
}

impl OpinionClassifier for PrefixClassifier {
    fn classify(&self, statement: &str) -> String {
        let lowered = statement.to_lowercase();
        first_chars(&lowered, self.key_chars).to_string()
    }
}

/// A named category recognized by a substring of the statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Case-insensitive substring to look for
    pub contains: String,
    /// Key assigned when the substring is present
    pub category: String,
}

impl CategoryRule {
    pub fn new(contains: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            contains: contains.into().to_lowercase(),
            category: category.into(),
        }
    }
}

/// Domain-aware classifier: the first matching category wins, otherwise the
/// statement falls back to its prefix key
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
    fallback: PrefixClassifier,
}

impl CategoryClassifier {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule::new(rule.contains, rule.category))
            .collect();
        Self {
            rules,
            fallback: PrefixClassifier::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: PrefixClassifier) -> Self {
        self.fallback = fallback;
        self
    }

    /// Categories used by the clinical consensus builder
    pub fn clinical() -> Self {
        Self::new(vec![
            CategoryRule::new("pneumonia", "pneumonia"),
            CategoryRule::new("sepsis", "sepsis"),
            CategoryRule::new("heart", "heart failure"),
        ])
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

impl OpinionClassifier for CategoryClassifier {
    fn classify(&self, statement: &str) -> String {
        let lowered = statement.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(rule.contains.as_str()))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| self.fallback.classify(statement))
    }
}
