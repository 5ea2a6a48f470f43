//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that agents and infrastructure adapters must
//! implement.

pub mod conversation_logger;
pub mod subscriber;
