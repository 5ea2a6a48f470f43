//! Messages published on the blackboard

pub mod entities;
pub mod value_objects;

pub use entities::{Message, MessageId};
pub use value_objects::{MessageKind, Priority};
