//! Application-level configuration.
//!
//! [`BusConfig`] groups the runtime knobs of the [`Blackboard`](crate::Blackboard):
//! how long a single subscriber may block dispatch and how many distinct
//! opinions a topic needs before consensus is evaluated.

use blackboard_domain::quorum::{DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_KEY_CHARS};
use std::time::Duration;

/// Knowledge bus behavior configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BusConfig {
    /// Upper bound for a single handler invocation.
    ///
    /// `None` waits indefinitely: a hung handler then blocks the whole
    /// dispatch chain.
    pub handler_timeout: Option<Duration>,
    /// Distinct agents required before consensus is evaluated.
    pub consensus_threshold: usize,
    /// Characters of the lower-cased statement used as the grouping key.
    pub opinion_key_chars: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            handler_timeout: None,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            opinion_key_chars: DEFAULT_KEY_CHARS,
        }
    }
}

impl BusConfig {
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Creates a timeout from milliseconds; `None` or `0` disables it.
    pub fn with_handler_timeout_ms(self, millis: Option<u64>) -> Self {
        let timeout = millis.filter(|ms| *ms > 0).map(Duration::from_millis);
        self.with_handler_timeout(timeout)
    }

    pub fn with_consensus_threshold(mut self, threshold: usize) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_opinion_key_chars(mut self, chars: usize) -> Self {
        self.opinion_key_chars = chars;
        self
    }
}
