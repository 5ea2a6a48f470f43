//! Subscription registry and sequential, failure-isolated delivery

use super::error::DeliveryError;
use crate::ports::subscriber::Subscriber;
use blackboard_domain::{AgentId, Message, TopicPattern};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Result of notifying one subscriber about one message
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub subscriber: AgentId,
    pub result: Result<(), DeliveryError>,
}

impl Delivery {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Clone)]
struct Registration {
    agent: AgentId,
    handler: Arc<dyn Subscriber>,
}

/// Subscriptions grouped by pattern, in first-registration order
///
/// Lives for the lifetime of the bus; a session reset does not touch it.
#[derive(Default)]
pub struct SubscriptionRegistry {
    patterns: Vec<(TopicPattern, Vec<Registration>)>,
}

impl SubscriptionRegistry {
    /// Register `handler` for `pattern`; a repeated (agent, pattern) pair is
    /// ignored. Returns whether a new subscription was added.
    pub fn register(
        &mut self,
        agent: &AgentId,
        pattern: TopicPattern,
        handler: Arc<dyn Subscriber>,
    ) -> bool {
        let registration = Registration {
            agent: agent.clone(),
            handler,
        };

        match self.patterns.iter_mut().find(|(p, _)| *p == pattern) {
            Some((_, registrations)) => {
                if registrations.iter().any(|r| r.agent == *agent) {
                    return false;
                }
                registrations.push(registration);
            }
            None => self.patterns.push((pattern, vec![registration])),
        }
        true
    }

    /// Handlers to notify for `topic`: matching, not the publisher, each
    /// agent at most once
    pub fn recipients(
        &self,
        topic: &str,
        publisher: &AgentId,
    ) -> Vec<(AgentId, Arc<dyn Subscriber>)> {
        let mut seen: HashSet<&AgentId> = HashSet::new();
        let mut recipients = Vec::new();

        for (pattern, registrations) in &self.patterns {
            if !pattern.matches(topic) {
                continue;
            }
            for registration in registrations {
                if registration.agent == *publisher || !seen.insert(&registration.agent) {
                    continue;
                }
                recipients.push((registration.agent.clone(), Arc::clone(&registration.handler)));
            }
        }

        recipients
    }

    /// Number of (agent, pattern) subscriptions
    pub fn len(&self) -> usize {
        self.patterns.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns registered by `agent`
    pub fn patterns_for(&self, agent: &AgentId) -> Vec<TopicPattern> {
        self.patterns
            .iter()
            .filter(|(_, registrations)| registrations.iter().any(|r| r.agent == *agent))
            .map(|(pattern, _)| pattern.clone())
            .collect()
    }
}

/// Invoke one handler, converting errors, panics and timeouts into a
/// [`DeliveryError`]
pub(crate) async fn deliver(
    subscriber: &AgentId,
    handler: &dyn Subscriber,
    message: &Message,
    timeout: Option<Duration>,
) -> Result<(), DeliveryError> {
    let call = AssertUnwindSafe(handler.on_message(message.topic(), message)).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    subscriber = %subscriber,
                    topic = message.topic(),
                    "Handler timed out after {:?}",
                    limit
                );
                return Err(DeliveryError::TimedOut(limit));
            }
        },
        None => call.await,
    };

    let result = match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DeliveryError::Handler(e)),
        Err(panic) => Err(DeliveryError::Panicked(panic_message(panic.as_ref()))),
    };

    if let Err(e) = &result
        && !e.is_timeout()
    {
        warn!(
            subscriber = %subscriber,
            topic = message.topic(),
            "Error notifying subscriber: {}",
            e
        );
    }

    result
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
