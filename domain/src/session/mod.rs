//! Analysis session reporting

pub mod summary;

pub use summary::{Highlight, MAX_HIGHLIGHTS, SessionSummary, extract_highlights};
