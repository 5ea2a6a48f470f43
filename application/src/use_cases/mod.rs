//! Use cases
//!
//! Application-level operations that drive the blackboard.

pub mod run_session;
pub mod scripted_agent;
