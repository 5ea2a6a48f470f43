//! The knowledge bus
//!
//! [`Blackboard`] is the facade; the other modules are its building blocks:
//!
//! - [`store`]: topic histories, the conversation log and the alert index
//! - [`dispatcher`]: subscription registry and isolated delivery
//! - [`correlator`]: question ids and collected responses

pub mod blackboard;
pub mod correlator;
pub mod dispatcher;
pub mod error;
pub mod store;

pub use blackboard::{Blackboard, FailedDelivery, PublishOutcome, QuestionHandle};
pub use dispatcher::Delivery;
pub use error::{BusError, DeliveryError};
