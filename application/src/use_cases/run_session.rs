//! Run Session use case
//!
//! Replays a scripted analysis session against a shared [`Blackboard`]:
//! the bus is cleared, scripted agents are registered, steps run in order,
//! and the session is condensed into a [`SessionReport`].

use super::scripted_agent::ScriptedAgent;
use crate::bus::blackboard::{Blackboard, FailedDelivery};
use crate::bus::error::BusError;
use blackboard_domain::{
    AgentId, ConsensusRecord, Highlight, Message, MessageKind, Priority, SessionSummary,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a session run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunSessionError {
    #[error("Agent '{agent}' could not subscribe: {source}")]
    Subscribe {
        agent: AgentId,
        #[source]
        source: BusError,
    },

    #[error("Step {index} ({action}) failed: {source}")]
    Step {
        index: usize,
        action: &'static str,
        #[source]
        source: BusError,
    },
}

/// A scripted agent taking part in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentScript {
    pub id: AgentId,
    pub patterns: Vec<String>,
    /// Canned answer sent to every question this agent hears
    #[serde(default)]
    pub auto_reply: Option<String>,
    /// Fail every delivery (exercises failure isolation)
    #[serde(default)]
    pub fail: bool,
}

fn default_kind() -> MessageKind {
    MessageKind::Finding
}

/// One action in a session script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionStep {
    Publish {
        agent: AgentId,
        topic: String,
        #[serde(default = "default_kind")]
        kind: MessageKind,
        #[serde(default)]
        payload: Value,
        #[serde(default)]
        priority: Priority,
    },
    Opinion {
        agent: AgentId,
        topic: String,
        statement: String,
        confidence: f64,
    },
    Ask {
        agent: AgentId,
        question: String,
        #[serde(default)]
        targets: Option<Vec<AgentId>>,
    },
    Respond {
        agent: AgentId,
        topic: String,
        response: String,
    },
}

impl SessionStep {
    pub fn action(&self) -> &'static str {
        match self {
            SessionStep::Publish { .. } => "publish",
            SessionStep::Opinion { .. } => "opinion",
            SessionStep::Ask { .. } => "ask",
            SessionStep::Respond { .. } => "respond",
        }
    }
}

/// A complete scripted session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub agents: Vec<AgentScript>,
    #[serde(default)]
    pub steps: Vec<SessionStep>,
}

/// A delivery that did not succeed during the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub subscriber: AgentId,
    pub topic: String,
    pub error: String,
}

impl From<FailedDelivery> for DeliveryFailure {
    fn from(failed: FailedDelivery) -> Self {
        Self {
            subscriber: failed.subscriber,
            topic: failed.topic,
            error: failed.error.to_string(),
        }
    }
}

/// A step that was skipped without aborting the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepWarning {
    pub index: usize,
    pub action: String,
    pub reason: String,
}

/// Everything the session owner needs after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub name: Option<String>,
    pub steps_run: usize,
    pub summary: SessionSummary,
    pub consensus: Vec<ConsensusRecord>,
    pub highlights: Vec<Highlight>,
    pub failures: Vec<DeliveryFailure>,
    #[serde(default)]
    pub warnings: Vec<StepWarning>,
    pub conversation: Vec<Message>,
}

impl SessionReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Use case for replaying a scripted session
pub struct RunSessionUseCase {
    board: Arc<Blackboard>,
    /// Agents already subscribed on this bus
    registered: Mutex<HashSet<AgentId>>,
}

impl RunSessionUseCase {
    pub fn new(board: Arc<Blackboard>) -> Self {
        Self {
            board,
            registered: Mutex::new(HashSet::new()),
        }
    }

    pub fn board(&self) -> &Arc<Blackboard> {
        &self.board
    }

    pub async fn execute(&self, script: &SessionScript) -> Result<SessionReport, RunSessionError> {
        info!(
            session = script.name.as_deref().unwrap_or("unnamed"),
            agents = script.agents.len(),
            steps = script.steps.len(),
            "Starting session"
        );

        self.board.clear();
        self.register_agents(&script.agents)?;

        let mut warnings = Vec::new();
        for (index, step) in script.steps.iter().enumerate() {
            debug!(index, action = step.action(), "Running step");
            match self.run_step(step).await {
                Ok(()) => {}
                // A late or stray answer is dropped, the session goes on
                Err(BusError::UnknownQuestion(topic)) => {
                    debug!(index, topic = %topic, "Skipping response to unknown question");
                    warnings.push(StepWarning {
                        index,
                        action: step.action().to_string(),
                        reason: format!("no pending question for topic '{}'", topic),
                    });
                }
                Err(source) => {
                    return Err(RunSessionError::Step {
                        index,
                        action: step.action(),
                        source,
                    });
                }
            }
        }

        let report = SessionReport {
            name: script.name.clone(),
            steps_run: script.steps.len(),
            summary: self.board.summary(),
            consensus: self.board.consensus_records(),
            highlights: self.board.highlights(),
            failures: self
                .board
                .failed_deliveries()
                .into_iter()
                .map(DeliveryFailure::from)
                .collect(),
            warnings,
            conversation: self
                .board
                .conversation_log()
                .iter()
                .map(|m| m.as_ref().clone())
                .collect(),
        };

        info!(
            messages = report.summary.total_messages,
            alerts = report.summary.critical_alerts,
            consensus = report.summary.consensus_topics,
            failures = report.failures.len(),
            warnings = report.warnings.len(),
            "Session complete"
        );
        Ok(report)
    }

    fn register_agents(&self, agents: &[AgentScript]) -> Result<(), RunSessionError> {
        let mut registered = self.registered.lock().unwrap_or_else(PoisonError::into_inner);

        for script in agents {
            if registered.contains(&script.id) {
                debug!(agent = %script.id, "Agent already registered");
                continue;
            }
            let agent = ScriptedAgent::new(script.id.clone(), Arc::downgrade(&self.board))
                .with_auto_reply(script.auto_reply.clone())
                .failing(script.fail);
            self.board
                .subscribe(script.id.clone(), &script.patterns, Arc::new(agent))
                .map_err(|source| RunSessionError::Subscribe {
                    agent: script.id.clone(),
                    source,
                })?;
            registered.insert(script.id.clone());
        }
        Ok(())
    }

    async fn run_step(&self, step: &SessionStep) -> Result<(), BusError> {
        match step {
            SessionStep::Publish {
                agent,
                topic,
                kind,
                payload,
                priority,
            } => {
                self.board
                    .publish(agent.clone(), *kind, topic.clone(), payload.clone(), *priority)
                    .await;
            }
            SessionStep::Opinion {
                agent,
                topic,
                statement,
                confidence,
            } => {
                self.board
                    .post_opinion(agent.clone(), topic, statement.clone(), *confidence)?;
            }
            SessionStep::Ask {
                agent,
                question,
                targets,
            } => {
                self.board
                    .ask_question(agent.clone(), question.clone(), targets.clone())
                    .await;
            }
            SessionStep::Respond {
                agent,
                topic,
                response,
            } => {
                self.board
                    .respond_to_question(agent.clone(), topic, response.clone())
                    .await?;
            }
        }
        Ok(())
    }
}
