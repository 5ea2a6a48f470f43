//! Subscription pattern matching
//!
//! Patterns are deliberately small: an exact topic, a prefix (`lab_*`) or a
//! suffix (`*_critical`). The bare `*` is a prefix pattern with an empty
//! prefix and therefore matches every topic.
//!
//! Anything else containing `*` (`*lab*`, `lab_*_done`, `**`) is rejected
//! when parsed instead of silently never matching.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

const WILDCARD: char = '*';

/// A parsed subscription pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TopicPattern {
    /// Matches exactly one topic
    Exact(String),
    /// Matches topics starting with the given prefix (`prefix*`)
    Prefix(String),
    /// Matches topics ending with the given suffix (`*suffix`)
    Suffix(String),
}

impl TopicPattern {
    /// Parse a raw subscription pattern
    ///
    /// # Example
    ///
    /// ```
    /// use blackboard_domain::topic::TopicPattern;
    ///
    /// let pattern = TopicPattern::parse("lab_*").unwrap();
    /// assert!(pattern.matches("lab_complete"));
    /// assert!(!pattern.matches("xlab_complete"));
    ///
    /// assert!(TopicPattern::parse("*lab*").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invalid_pattern(raw, "pattern is empty"));
        }

        if raw == "*" {
            return Ok(TopicPattern::Prefix(String::new()));
        }

        let leading = raw.starts_with(WILDCARD);
        let trailing = raw.ends_with(WILDCARD);

        if leading && trailing {
            return Err(DomainError::invalid_pattern(
                raw,
                "wildcards at both ends are not supported",
            ));
        }

        let body = if trailing {
            &raw[..raw.len() - 1]
        } else if leading {
            &raw[1..]
        } else {
            raw
        };

        if body.contains(WILDCARD) {
            return Err(DomainError::invalid_pattern(
                raw,
                "wildcards are only allowed at the start or end",
            ));
        }

        Ok(if trailing {
            TopicPattern::Prefix(body.to_string())
        } else if leading {
            TopicPattern::Suffix(body.to_string())
        } else {
            TopicPattern::Exact(body.to_string())
        })
    }

    /// Check whether `topic` is routed to this pattern
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            TopicPattern::Exact(exact) => topic == exact,
            TopicPattern::Prefix(prefix) => topic.starts_with(prefix.as_str()),
            TopicPattern::Suffix(suffix) => topic.ends_with(suffix.as_str()),
        }
    }

    /// Whether this pattern can match more than one topic
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, TopicPattern::Exact(_))
    }
}

impl std::fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicPattern::Exact(exact) => write!(f, "{}", exact),
            TopicPattern::Prefix(prefix) => write!(f, "{}{}", prefix, WILDCARD),
            TopicPattern::Suffix(suffix) => write!(f, "{}{}", WILDCARD, suffix),
        }
    }
}

impl std::str::FromStr for TopicPattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicPattern::parse(s)
    }
}

impl TryFrom<String> for TopicPattern {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TopicPattern::parse(&value)
    }
}

impl From<TopicPattern> for String {
    fn from(pattern: TopicPattern) -> Self {
        pattern.to_string()
    }
}

/// Check a topic against a raw pattern string
///
/// Malformed patterns never match.
pub fn matches(topic: &str, pattern: &str) -> bool {
    TopicPattern::parse(pattern)
        .map(|p| p.matches(topic))
        .unwrap_or(false)
}
