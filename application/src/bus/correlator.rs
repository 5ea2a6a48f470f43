//! Question/response correlation
//!
//! Questions get a stable id from a counter that only ever grows, and are
//! kept in a map keyed by that id. Their topic (`question_<id>`) is derived
//! from the id, never from the question's position in a list, so clearing
//! or answering other questions cannot shift which question a topic names.

use blackboard_domain::{AgentId, PendingQuestion, QuestionId, QuestionTargets};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct QuestionBook {
    next_id: u64,
    pending: BTreeMap<QuestionId, PendingQuestion>,
}

impl Default for QuestionBook {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: BTreeMap::new(),
        }
    }
}

impl QuestionBook {
    /// Mint a new pending question
    pub fn open(
        &mut self,
        asking_agent: AgentId,
        question: impl Into<String>,
        targets: QuestionTargets,
    ) -> PendingQuestion {
        let id = QuestionId::new(self.next_id);
        self.next_id += 1;

        let pending = PendingQuestion::new(id, asking_agent, question, targets);
        self.pending.insert(id, pending.clone());
        pending
    }

    /// Append a response to the question published on `topic`
    ///
    /// Returns `None` when no such question is pending.
    pub fn respond(
        &mut self,
        topic: &str,
        agent: AgentId,
        response: impl Into<String>,
    ) -> Option<QuestionId> {
        let id = QuestionId::from_topic(topic)?;
        let question = self.pending.get_mut(&id)?;
        question.add_response(agent, response);
        Some(id)
    }

    pub fn get(&self, id: QuestionId) -> Option<&PendingQuestion> {
        self.pending.get(&id)
    }

    /// Pending questions in the order they were asked
    pub fn all(&self) -> impl Iterator<Item = &PendingQuestion> {
        self.pending.values()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending question; ids keep counting up
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
