//! Application layer for agent-blackboard
//!
//! This crate contains the knowledge bus, the ports agents and adapters
//! implement, and the session use case. It depends only on the domain layer.

pub mod bus;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use bus::{
    Blackboard, BusError, Delivery, DeliveryError, FailedDelivery, PublishOutcome, QuestionHandle,
};
pub use config::BusConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    subscriber::{Subscriber, SubscriberError},
};
pub use use_cases::run_session::{
    AgentScript, DeliveryFailure, RunSessionError, RunSessionUseCase, SessionReport,
    SessionScript, SessionStep, StepWarning,
};
pub use use_cases::scripted_agent::ScriptedAgent;
