use blackboard_application::{SessionScript, SessionStep};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a scenario file
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Could not read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported scenario extension for {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid scenario step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Json,
    Toml,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(ScenarioFormat::Json),
            "toml" => Some(ScenarioFormat::Toml),
            _ => None,
        }
    }
}

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> Result<SessionScript, ScenarioError> {
        let format = ScenarioFormat::from_path(path)
            .ok_or_else(|| ScenarioError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let script = Self::parse(&content, format)?;
        debug!(
            path = %path.display(),
            agents = script.agents.len(),
            steps = script.steps.len(),
            "Loaded scenario"
        );
        Ok(script)
    }

    pub fn parse(content: &str, format: ScenarioFormat) -> Result<SessionScript, ScenarioError> {
        let script: SessionScript = match format {
            ScenarioFormat::Json => serde_json::from_str(content)?,
            ScenarioFormat::Toml => toml::from_str(content)?,
        };
        Self::check(&script)?;
        Ok(script)
    }

    /// Reject steps the bus would only fail on later
    fn check(script: &SessionScript) -> Result<(), ScenarioError> {
        for (index, step) in script.steps.iter().enumerate() {
            let (agent, topic) = match step {
                SessionStep::Publish { agent, topic, .. }
                | SessionStep::Opinion { agent, topic, .. }
                | SessionStep::Respond { agent, topic, .. } => (agent, Some(topic)),
                SessionStep::Ask { agent, .. } => (agent, None),
            };
            if agent.is_empty() {
                return Err(ScenarioError::InvalidStep {
                    index,
                    reason: "empty agent id".to_string(),
                });
            }
            if topic.is_some_and(|t| t.is_empty()) {
                return Err(ScenarioError::InvalidStep {
                    index,
                    reason: "empty topic".to_string(),
                });
            }
        }
        Ok(())
    }
}
