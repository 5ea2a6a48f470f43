//! Core domain concepts shared across all subdomains.
//!
//! - [`agent::AgentId`]: identity of a worker on the blackboard
//! - [`error::DomainError`]: domain-level errors
//! - [`string::truncate`]: display helpers

pub mod agent;
pub mod error;
pub mod string;
