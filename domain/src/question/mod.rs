//! Questions agents ask each other and the answers they collect

pub mod entities;

pub use entities::{PendingQuestion, QuestionId, QuestionResponse, QuestionTargets};
