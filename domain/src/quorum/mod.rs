//! Opinion ledger and consensus
//!
//! Agents state opinions on topics; once enough distinct agents have spoken
//! on a topic, the [`ConsensusEngine`] computes a majority verdict.
//!
//! ```text
//! post_opinion ──▶ OpinionLedger (latest per agent)
//!                        │
//!            count ≥ threshold?
//!                        │ yes
//!                        ▼
//!   ConsensusEngine: classify ─▶ group ─▶ sum confidences ─▶ heaviest wins
//!                        │
//!                        ▼
//!               ConsensusRecord (replaces previous)
//! ```

pub mod classifier;
pub mod consensus;
pub mod ledger;
pub mod opinion;

pub use classifier::{
    CategoryClassifier, CategoryRule, DEFAULT_KEY_CHARS, OpinionClassifier, PrefixClassifier,
};
pub use consensus::{ConsensusEngine, ConsensusRecord, ConsensusState, DEFAULT_CONSENSUS_THRESHOLD};
pub use ledger::{OpinionLedger, TopicOpinions};
pub use opinion::Opinion;
