//! Topics and subscription patterns

pub mod pattern;

pub use pattern::{TopicPattern, matches};

/// Prefix of the topics minted for questions (`question_<id>`)
pub const QUESTION_TOPIC_PREFIX: &str = "question_";
