//! Session script files
//!
//! A scenario is a [`SessionScript`] stored as JSON (`.json`) or TOML
//! (`.toml`). The format is picked from the file extension.

mod loader;

pub use loader::{ScenarioError, ScenarioFormat, ScenarioLoader};
