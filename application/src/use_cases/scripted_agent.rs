//! Scripted agent
//!
//! A [`Subscriber`] driven by a [`AgentScript`](super::run_session::AgentScript):
//! it counts what it hears, answers questions with a canned reply, and can be
//! told to fail every delivery to exercise failure isolation.

use crate::bus::blackboard::Blackboard;
use crate::ports::subscriber::{Subscriber, SubscriberError};
use async_trait::async_trait;
use blackboard_domain::{AgentId, Message, MessageKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Weak;
use tracing::debug;

pub struct ScriptedAgent {
    id: AgentId,
    board: Weak<Blackboard>,
    auto_reply: Option<String>,
    fail: bool,
    received: AtomicUsize,
}

impl ScriptedAgent {
    pub fn new(id: AgentId, board: Weak<Blackboard>) -> Self {
        Self {
            id,
            board,
            auto_reply: None,
            fail: false,
            received: AtomicUsize::new(0),
        }
    }

    pub fn with_auto_reply(mut self, reply: Option<String>) -> Self {
        self.auto_reply = reply;
        self
    }

    pub fn failing(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// Messages delivered to this agent so far
    pub fn received(&self) -> usize {
        self.received.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Subscriber for ScriptedAgent {
    async fn on_message(&self, topic: &str, message: &Message) -> Result<(), SubscriberError> {
        self.received.fetch_add(1, Ordering::Relaxed);

        if self.fail {
            return Err(SubscriberError::failed(format!(
                "{} refused message on {}",
                self.id, topic
            )));
        }

        let Some(reply) = &self.auto_reply else {
            return Ok(());
        };
        if message.kind() != MessageKind::Question {
            return Ok(());
        }

        let board = self
            .board
            .upgrade()
            .ok_or_else(|| SubscriberError::failed("blackboard is gone"))?;
        debug!(agent = %self.id, topic, "Auto-replying");
        board
            .respond_to_question(self.id.clone(), topic, reply.clone())
            .await
            .map_err(|e| SubscriberError::failed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackboard_domain::Priority;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_auto_reply_answers_questions_only() {
        let board = Arc::new(Blackboard::new());
        let lab = Arc::new(
            ScriptedAgent::new("Lab".into(), Arc::downgrade(&board))
                .with_auto_reply(Some("WBC is 18".to_string())),
        );
        board.subscribe("Lab", ["question_*", "imaging_*"], lab.clone()).unwrap();

        board
            .publish("Imaging", MessageKind::Finding, "imaging_complete", json!({}), Priority::Normal)
            .await;
        let handle = board.ask_question("Imaging", "Is WBC elevated?", None).await;

        assert!(handle.outcome.all_delivered());
        assert_eq!(lab.received(), 2);
        let pending = board.pending_question(handle.id).unwrap();
        assert_eq!(pending.responses.len(), 1);
        assert_eq!(pending.responses[0].response, "WBC is 18");
    }

    #[tokio::test]
    async fn test_failing_agent_reports_error() {
        let board = Arc::new(Blackboard::new());
        let broken = Arc::new(ScriptedAgent::new("Broken".into(), Arc::downgrade(&board)).failing(true));
        board.subscribe("Broken", ["*"], broken.clone()).unwrap();

        let outcome = board
            .publish("System", MessageKind::Finding, "patient_data", json!({}), Priority::Normal)
            .await;

        assert_eq!(outcome.failures().count(), 1);
        assert_eq!(broken.received(), 1);
    }
}
