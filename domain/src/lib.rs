//! Domain layer for agent-blackboard
//!
//! This crate contains the core entities and value objects of the shared
//! knowledge bus. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Messages and Topics
//!
//! - **Message**: an immutable record of a finding, question, response,
//!   alert or consensus announcement, addressed by topic
//! - **TopicPattern**: exact, prefix (`lab_*`) or suffix (`*_critical`)
//!   subscription patterns
//!
//! ## Questions
//!
//! - **PendingQuestion**: a question with a stable id and the answers
//!   collected so far
//!
//! ## Quorum
//!
//! - **Opinion**: an agent's latest position on a topic
//! - **ConsensusEngine**: confidence-weighted majority over the opinions of
//!   at least three distinct agents

pub mod config;
pub mod core;
pub mod message;
pub mod question;
pub mod quorum;
pub mod session;
pub mod topic;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{agent::AgentId, error::DomainError};
pub use message::{Message, MessageId, MessageKind, Priority};
pub use question::{PendingQuestion, QuestionId, QuestionResponse, QuestionTargets};
pub use quorum::{
    CategoryClassifier, CategoryRule, ConsensusEngine, ConsensusRecord, ConsensusState, Opinion,
    OpinionClassifier, OpinionLedger, PrefixClassifier,
};
pub use session::{Highlight, SessionSummary, extract_highlights};
pub use topic::TopicPattern;
