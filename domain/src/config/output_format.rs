//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for session reports
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary, consensus, highlights and the full conversation
    Full,
    /// Summary counters and consensus verdicts (default)
    Summary,
    /// JSON output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Summary
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "summary" => Ok(Self::Summary),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}. Valid: full, summary, json", s)),
        }
    }
}
