//! Bus configuration from TOML (`[bus]` section)

use serde::{Deserialize, Serialize};

/// Raw bus configuration from TOML
///
/// ```toml
/// [bus]
/// handler_timeout_ms = 5000   # 0 or absent waits indefinitely
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBusConfig {
    /// Upper bound for a single subscriber invocation, in milliseconds
    pub handler_timeout_ms: Option<u64>,
}
