//! The shared knowledge bus
//!
//! [`Blackboard`] owns every piece of session state (topic histories, the
//! conversation log, alerts, pending questions, opinions and consensus
//! records) plus the process-lifetime subscription registry. Agents only
//! touch that state through the methods here.
//!
//! # Flow
//!
//! ```text
//! publish ──▶ append to KnowledgeStore + ConversationLog
//!         ──▶ CRITICAL? ──▶ AlertRegistry
//!         ──▶ for each matching subscriber (sequentially):
//!                 skip publisher / already notified
//!                 await on_message, isolate failures
//!         ──▶ PublishOutcome { message, deliveries }
//!
//! post_opinion ──▶ OpinionLedger ──▶ ≥ threshold? ──▶ ConsensusEngine
//! ```
//!
//! # Concurrency
//!
//! State sits behind a mutex that is only held for synchronous bookkeeping,
//! never across an `.await`. Handlers may therefore call back into the bus;
//! a nested publish is fully delivered before the outer dispatch resumes.

use super::correlator::QuestionBook;
use super::dispatcher::{Delivery, SubscriptionRegistry, deliver};
use super::error::{BusError, DeliveryError};
use super::store::{AlertRegistry, ConversationLog, KnowledgeStore};
use crate::config::BusConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::subscriber::Subscriber;
use blackboard_domain::{
    AgentId, ConsensusEngine, ConsensusRecord, ConsensusState, DomainError, Highlight, Message,
    MessageKind, Opinion, OpinionClassifier, OpinionLedger, PendingQuestion, PrefixClassifier,
    Priority, QuestionId, QuestionTargets, SessionSummary, TopicPattern, extract_highlights,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// What a publish produced: the stored message and one delivery result per
/// notified subscriber
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub message: Arc<Message>,
    pub deliveries: Vec<Delivery>,
}

impl PublishOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(|d| !d.is_ok())
    }

    pub fn all_delivered(&self) -> bool {
        self.deliveries.iter().all(Delivery::is_ok)
    }

    /// Agents that were notified, in notification order
    pub fn notified(&self) -> Vec<&AgentId> {
        self.deliveries.iter().map(|d| &d.subscriber).collect()
    }
}

/// A failed delivery, recorded for every dispatch including nested ones
#[derive(Debug, Clone, PartialEq)]
pub struct FailedDelivery {
    pub subscriber: AgentId,
    pub topic: String,
    pub error: DeliveryError,
}

/// A question that has been asked and published
#[derive(Debug, Clone)]
pub struct QuestionHandle {
    pub id: QuestionId,
    pub topic: String,
    pub targets: QuestionTargets,
    pub outcome: PublishOutcome,
}

#[derive(Default)]
struct BoardState {
    /// Message sequence; survives `clear` so ids stay unique
    sequence: u64,
    store: KnowledgeStore,
    log: ConversationLog,
    alerts: AlertRegistry,
    questions: QuestionBook,
    ledger: OpinionLedger,
    consensus: BTreeMap<String, ConsensusRecord>,
    failed: Vec<FailedDelivery>,
}

impl BoardState {
    fn reset_session(&mut self) {
        self.store.clear();
        self.log.clear();
        self.alerts.clear();
        self.questions.clear();
        self.ledger.clear();
        self.consensus.clear();
        self.failed.clear();
    }
}

/// In-memory coordination bus for one analysis session at a time
///
/// # Example
///
/// ```
/// use blackboard_application::Blackboard;
/// use blackboard_domain::{MessageKind, Priority};
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let board = Blackboard::new();
/// board
///     .publish("LabAnalyzer", MessageKind::Finding, "lab_complete", json!({"wbc": 18}), Priority::Normal)
///     .await;
/// assert_eq!(board.latest_payload("lab_complete"), Some(json!({"wbc": 18})));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Blackboard {
    state: Mutex<BoardState>,
    subscriptions: RwLock<SubscriptionRegistry>,
    engine: ConsensusEngine,
    config: BusConfig,
    logger: Arc<dyn ConversationLogger>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        let engine = ConsensusEngine::new(
            config.consensus_threshold,
            Arc::new(PrefixClassifier::new(config.opinion_key_chars)),
        );
        Self {
            state: Mutex::new(BoardState::default()),
            subscriptions: RwLock::new(SubscriptionRegistry::default()),
            engine,
            config,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Replace the opinion classifier used for consensus grouping
    pub fn with_classifier(mut self, classifier: Arc<dyn OpinionClassifier>) -> Self {
        self.engine = self.engine.with_classifier(classifier);
        self
    }

    /// Record traffic to a structured transcript
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriptions(&self) -> RwLockReadGuard<'_, SubscriptionRegistry> {
        self.subscriptions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriptions_mut(&self) -> RwLockWriteGuard<'_, SubscriptionRegistry> {
        self.subscriptions.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Subscriptions ====================

    /// Register `handler` for every pattern in `patterns`
    ///
    /// All patterns are parsed before anything is registered, so a single
    /// malformed pattern leaves the registry untouched.
    pub fn subscribe<I, S>(
        &self,
        agent: impl Into<AgentId>,
        patterns: I,
        handler: Arc<dyn Subscriber>,
    ) -> Result<(), BusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let agent = agent.into();
        if agent.is_empty() {
            return Err(DomainError::EmptyAgentId.into());
        }

        let parsed = patterns
            .into_iter()
            .map(|raw| TopicPattern::parse(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| BusError::Pattern {
                agent: agent.to_string(),
                source,
            })?;

        let mut registry = self.subscriptions_mut();
        for pattern in parsed {
            debug!(agent = %agent, pattern = %pattern, "Subscribed");
            registry.register(&agent, pattern, Arc::clone(&handler));
        }
        Ok(())
    }

    /// Number of (agent, pattern) subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions().len()
    }

    /// Patterns `agent` is subscribed to
    pub fn subscriptions_of(&self, agent: &AgentId) -> Vec<TopicPattern> {
        self.subscriptions().patterns_for(agent)
    }

    // ==================== Publishing ====================

    /// Store a message and notify every matching subscriber in turn
    pub async fn publish(
        &self,
        publisher: impl Into<AgentId>,
        kind: MessageKind,
        topic: impl Into<String>,
        payload: Value,
        priority: Priority,
    ) -> PublishOutcome {
        let message = {
            let mut state = self.state();
            state.sequence += 1;
            let message = Arc::new(Message::new(
                state.sequence,
                publisher.into(),
                kind,
                topic,
                payload,
                priority,
            ));
            state.store.append(Arc::clone(&message));
            state.log.append(Arc::clone(&message));
            if state.alerts.record_if_critical(&message) {
                warn!(
                    agent = %message.publisher(),
                    topic = message.topic(),
                    "CRITICAL ALERT"
                );
            }
            message
        };

        debug!(
            agent = %message.publisher(),
            topic = message.topic(),
            kind = %message.kind(),
            priority = %message.priority(),
            "Published {}",
            message.id()
        );
        self.logger.log(ConversationEvent::published(&message));

        let deliveries = self.dispatch(&message).await;
        PublishOutcome {
            message,
            deliveries,
        }
    }

    async fn dispatch(&self, message: &Message) -> Vec<Delivery> {
        // Snapshot so handlers can subscribe or publish without deadlocking
        let recipients = self
            .subscriptions()
            .recipients(message.topic(), message.publisher());

        let mut deliveries = Vec::with_capacity(recipients.len());
        for (subscriber, handler) in recipients {
            let result = deliver(
                &subscriber,
                handler.as_ref(),
                message,
                self.config.handler_timeout,
            )
            .await;
            if let Err(error) = &result {
                self.state().failed.push(FailedDelivery {
                    subscriber: subscriber.clone(),
                    topic: message.topic().to_string(),
                    error: error.clone(),
                });
            }
            deliveries.push(Delivery { subscriber, result });
        }
        deliveries
    }

    // ==================== Questions ====================

    /// Ask other agents a question; never waits for answers
    pub async fn ask_question(
        &self,
        asking_agent: impl Into<AgentId>,
        question: impl Into<String>,
        targets: Option<Vec<AgentId>>,
    ) -> QuestionHandle {
        let asking_agent = asking_agent.into();
        let question = question.into();
        let pending = self.state().questions.open(
            asking_agent.clone(),
            question.clone(),
            QuestionTargets::from_list(targets),
        );
        let topic = pending.topic();

        info!(agent = %asking_agent, topic = %topic, "Question asked: {}", question);

        let outcome = self
            .publish(
                asking_agent,
                MessageKind::Question,
                topic.clone(),
                Value::String(question),
                Priority::Normal,
            )
            .await;

        QuestionHandle {
            id: pending.id,
            topic,
            targets: pending.targets,
            outcome,
        }
    }

    /// Answer the question published on `question_topic`
    ///
    /// Unknown topics (never asked, or cleared with the last session) are
    /// rejected without recording or publishing anything.
    pub async fn respond_to_question(
        &self,
        agent: impl Into<AgentId>,
        question_topic: &str,
        response: impl Into<String>,
    ) -> Result<PublishOutcome, BusError> {
        let agent = agent.into();
        let response = response.into();

        let recorded = self
            .state()
            .questions
            .respond(question_topic, agent.clone(), response.clone());
        if recorded.is_none() {
            warn!(
                agent = %agent,
                topic = question_topic,
                "Dropping response to unknown question"
            );
            return Err(BusError::UnknownQuestion(question_topic.to_string()));
        }

        Ok(self
            .publish(
                agent,
                MessageKind::Response,
                question_topic,
                Value::String(response),
                Priority::Normal,
            )
            .await)
    }

    pub fn pending_question(&self, id: QuestionId) -> Option<PendingQuestion> {
        self.state().questions.get(id).cloned()
    }

    pub fn pending_questions(&self) -> Vec<PendingQuestion> {
        self.state().questions.all().cloned().collect()
    }

    // ==================== Opinions & Consensus ====================

    /// State (or restate) an agent's opinion on a topic
    ///
    /// Returns the fresh consensus record when the topic has reached the
    /// threshold, `None` while it is still accumulating.
    pub fn post_opinion(
        &self,
        agent: impl Into<AgentId>,
        topic: &str,
        statement: impl Into<String>,
        confidence: f64,
    ) -> Result<Option<ConsensusRecord>, BusError> {
        let agent = agent.into();
        if topic.is_empty() {
            return Err(DomainError::EmptyTopic.into());
        }
        let opinion = Opinion::new(statement, confidence)?;

        let record = {
            let mut state = self.state();
            let count = state.ledger.post(topic, agent.clone(), opinion);
            if !self.engine.is_ready(count) {
                debug!(agent = %agent, topic, count, "Opinion recorded");
                return Ok(None);
            }
            let record = state
                .ledger
                .topic(topic)
                .and_then(|opinions| self.engine.evaluate(topic, opinions));
            if let Some(record) = &record {
                state.consensus.insert(topic.to_string(), record.clone());
            }
            record
        };

        if let Some(record) = &record {
            info!(
                topic,
                decision = %record.consensus,
                confidence = record.confidence,
                supporting = record.supporting_agents.len(),
                dissenting = record.dissenting_groups,
                "Consensus reached"
            );
            self.logger.log(ConversationEvent::consensus(record));
        }
        Ok(record)
    }

    pub fn consensus(&self, topic: &str) -> Option<ConsensusRecord> {
        self.state().consensus.get(topic).cloned()
    }

    /// All consensus records, ordered by topic
    pub fn consensus_records(&self) -> Vec<ConsensusRecord> {
        self.state().consensus.values().cloned().collect()
    }

    pub fn consensus_state(&self, topic: &str) -> ConsensusState {
        self.engine.state_for(self.state().ledger.count(topic))
    }

    /// Current opinions on a topic in first-post order
    pub fn opinions(&self, topic: &str) -> Vec<(AgentId, Opinion)> {
        self.state()
            .ledger
            .topic(topic)
            .map(|t| t.entries().to_vec())
            .unwrap_or_default()
    }

    pub fn opinion_count(&self, topic: &str) -> usize {
        self.state().ledger.count(topic)
    }

    // ==================== Queries ====================

    pub fn latest(&self, topic: &str) -> Option<Arc<Message>> {
        self.state().store.latest(topic)
    }

    /// Payload of the latest message on `topic`
    pub fn latest_payload(&self, topic: &str) -> Option<Value> {
        self.latest(topic).map(|m| m.payload().clone())
    }

    pub fn all(&self, topic: &str) -> Vec<Arc<Message>> {
        self.state().store.all(topic)
    }

    pub fn has_alert(&self, topic: &str) -> bool {
        self.state().alerts.has_alert(topic)
    }

    pub fn alert_count(&self) -> usize {
        self.state().alerts.len()
    }

    pub fn alerts(&self) -> Vec<Arc<Message>> {
        self.state().alerts.alerts().to_vec()
    }

    /// Every failed delivery this session, nested dispatches included, in
    /// the order the failures happened
    pub fn failed_deliveries(&self) -> Vec<FailedDelivery> {
        self.state().failed.clone()
    }

    pub fn conversation_log(&self) -> Vec<Arc<Message>> {
        self.state().log.messages().to_vec()
    }

    /// Messages published by one agent, in publish order
    pub fn conversation_for(&self, agent: &AgentId) -> Vec<Arc<Message>> {
        self.state().log.by_agent(agent)
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.state();
        SessionSummary {
            total_messages: state.log.len(),
            critical_alerts: state.alerts.len(),
            questions_asked: state.questions.len(),
            consensus_topics: state.consensus.len(),
        }
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        let state = self.state();
        extract_highlights(state.log.messages().iter().map(Arc::as_ref))
    }

    // ==================== Lifecycle ====================

    /// Reset all session state; subscriptions are kept
    ///
    /// Must be called by the session owner before each new session.
    pub fn clear(&self) {
        self.state().reset_session();
        self.logger.log(ConversationEvent::cleared());
        info!("Blackboard cleared for new session");
    }
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::subscriber::SubscriberError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Weak;
    use std::time::Duration;

    /// Records every (topic, payload) it receives
    #[derive(Default)]
    struct Recorder {
        received: Mutex<Vec<(String, Value)>>,
    }

    impl Recorder {
        fn received(&self) -> Vec<(String, Value)> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Subscriber for Recorder {
        async fn on_message(&self, topic: &str, message: &Message) -> Result<(), SubscriberError> {
            self.received
                .lock()
                .unwrap()
                .push((topic.to_string(), message.payload().clone()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Subscriber for Failing {
        async fn on_message(&self, _topic: &str, _message: &Message) -> Result<(), SubscriberError> {
            Err(SubscriberError::failed("lab parser crashed"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Subscriber for Panicking {
        async fn on_message(&self, _topic: &str, _message: &Message) -> Result<(), SubscriberError> {
            panic!("handler exploded");
        }
    }

    struct Hanging;

    #[async_trait]
    impl Subscriber for Hanging {
        async fn on_message(&self, _topic: &str, _message: &Message) -> Result<(), SubscriberError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    /// Publishes a follow-up finding whenever it hears something
    struct Echo {
        board: Weak<Blackboard>,
        order: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Subscriber for Echo {
        async fn on_message(&self, topic: &str, _message: &Message) -> Result<(), SubscriberError> {
            self.order.lock().unwrap().push(format!("echo:{}", topic));
            let board = self
                .board
                .upgrade()
                .ok_or_else(|| SubscriberError::failed("board dropped"))?;
            board
                .publish(
                    "Echo",
                    MessageKind::Finding,
                    format!("{}_echo", topic),
                    Value::Null,
                    Priority::Normal,
                )
                .await;
            Ok(())
        }
    }

    struct Ordered {
        name: &'static str,
        order: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Subscriber for Ordered {
        async fn on_message(&self, topic: &str, _message: &Message) -> Result<(), SubscriberError> {
            self.order.lock().unwrap().push(format!("{}:{}", self.name, topic));
            Ok(())
        }
    }

    async fn finding(board: &Blackboard, agent: &str, topic: &str, payload: Value) -> PublishOutcome {
        board
            .publish(agent, MessageKind::Finding, topic, payload, Priority::Normal)
            .await
    }

    #[tokio::test]
    async fn test_scenario_wildcard_delivery() {
        let board = Blackboard::new();
        let x = Arc::new(Recorder::default());
        board.subscribe("X", ["lab_*"], x.clone()).unwrap();

        let outcome = finding(&board, "Y", "lab_complete", json!({"wbc": 18})).await;

        assert_eq!(x.received(), vec![("lab_complete".to_string(), json!({"wbc": 18}))]);
        assert_eq!(board.latest_payload("lab_complete"), Some(json!({"wbc": 18})));
        assert_eq!(outcome.notified(), vec![&AgentId::new("X")]);
        assert!(outcome.all_delivered());
    }

    #[tokio::test]
    async fn test_log_length_and_order_match_publish_calls() {
        let board = Blackboard::new();
        for (i, topic) in ["a", "b", "a", "c"].iter().enumerate() {
            finding(&board, "System", topic, json!(i)).await;
        }

        let log = board.conversation_log();
        let topics: Vec<_> = log.iter().map(|m| m.topic()).collect();
        assert_eq!(topics, vec!["a", "b", "a", "c"]);
        assert_eq!(board.latest_payload("a"), Some(json!(2)));
        assert_eq!(board.all("a").len(), 2);
    }

    #[tokio::test]
    async fn test_publisher_never_receives_own_message() {
        let board = Blackboard::new();
        let lab = Arc::new(Recorder::default());
        board.subscribe("Lab", ["lab_*", "*"], lab.clone()).unwrap();

        let outcome = finding(&board, "Lab", "lab_complete", json!(1)).await;

        assert!(lab.received().is_empty());
        assert!(outcome.deliveries.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_notified_once_across_patterns() {
        let board = Blackboard::new();
        let consensus = Arc::new(Recorder::default());
        board
            .subscribe(
                "ConsensusBuilder",
                ["clinical_decision_complete", "*_complete", "clinical_*"],
                consensus.clone(),
            )
            .unwrap();

        finding(&board, "Decision", "clinical_decision_complete", json!({})).await;
        assert_eq!(consensus.received().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_isolated_and_reported() {
        let board = Blackboard::new();
        let after = Arc::new(Recorder::default());
        board.subscribe("Broken", ["lab_*"], Arc::new(Failing)).unwrap();
        board.subscribe("Exploding", ["lab_*"], Arc::new(Panicking)).unwrap();
        board.subscribe("Healthy", ["lab_*"], after.clone()).unwrap();

        let outcome = finding(&board, "Lab", "lab_complete", json!(1)).await;

        assert_eq!(after.received().len(), 1);
        assert_eq!(outcome.deliveries.len(), 3);
        assert_eq!(
            outcome.deliveries[0].result,
            Err(DeliveryError::Handler(SubscriberError::failed("lab parser crashed")))
        );
        assert_eq!(
            outcome.deliveries[1].result,
            Err(DeliveryError::Panicked("handler exploded".to_string()))
        );
        assert!(outcome.deliveries[2].is_ok());
        assert_eq!(outcome.failures().count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_timeout() {
        let config = BusConfig::default().with_handler_timeout(Some(Duration::from_millis(100)));
        let board = Blackboard::with_config(config);
        let after = Arc::new(Recorder::default());
        board.subscribe("Slow", ["*"], Arc::new(Hanging)).unwrap();
        board.subscribe("Fast", ["*"], after.clone()).unwrap();

        let outcome = finding(&board, "System", "patient_data", json!({})).await;

        assert_eq!(
            outcome.deliveries[0].result,
            Err(DeliveryError::TimedOut(Duration::from_millis(100)))
        );
        assert_eq!(after.received().len(), 1);
    }

    #[tokio::test]
    async fn test_nested_publish_completes_before_outer_dispatch_resumes() {
        let board = Arc::new(Blackboard::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        board
            .subscribe(
                "Echo",
                ["lab_complete"],
                Arc::new(Echo {
                    board: Arc::downgrade(&board),
                    order: order.clone(),
                }),
            )
            .unwrap();
        board
            .subscribe(
                "Listener",
                ["lab_*"],
                Arc::new(Ordered {
                    name: "listener",
                    order: order.clone(),
                }),
            )
            .unwrap();

        finding(&board, "Lab", "lab_complete", json!(1)).await;

        assert_eq!(
            *order.lock().unwrap(),
            vec![
                "echo:lab_complete",
                "listener:lab_complete_echo",
                "listener:lab_complete",
            ]
        );
        let topics: Vec<_> = board
            .conversation_log()
            .iter()
            .map(|m| m.topic().to_string())
            .collect();
        assert_eq!(topics, vec!["lab_complete", "lab_complete_echo"]);
    }

    #[tokio::test]
    async fn test_failed_deliveries_include_nested_dispatches() {
        let board = Arc::new(Blackboard::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        board
            .subscribe(
                "Echo",
                ["lab_complete"],
                Arc::new(Echo {
                    board: Arc::downgrade(&board),
                    order: order.clone(),
                }),
            )
            .unwrap();
        board.subscribe("Broken", ["lab_*"], Arc::new(Failing)).unwrap();

        let outcome = finding(&board, "Lab", "lab_complete", json!(1)).await;

        // Only the outer failure is visible on the outcome
        assert_eq!(outcome.failures().count(), 1);

        let failed = board.failed_deliveries();
        let topics: Vec<_> = failed.iter().map(|f| f.topic.as_str()).collect();
        assert_eq!(topics, vec!["lab_complete_echo", "lab_complete"]);
        assert!(failed.iter().all(|f| f.subscriber.as_str() == "Broken"));

        board.clear();
        assert!(board.failed_deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_critical_alerts() {
        let board = Blackboard::new();
        assert!(!board.has_alert("critical_x"));

        board
            .publish("Lab", MessageKind::Alert, "critical_x", json!({}), Priority::Critical)
            .await;
        board
            .publish("Lab", MessageKind::Alert, "critical_y", json!({}), Priority::Normal)
            .await;

        assert!(board.has_alert("critical_x"));
        assert!(!board.has_alert("critical_y"));
        assert_eq!(board.alert_count(), 1);
    }

    #[tokio::test]
    async fn test_message_ids_unique_across_clear() {
        let board = Blackboard::new();
        let first = finding(&board, "A", "t", json!(1)).await;
        board.clear();
        let second = finding(&board, "A", "t", json!(2)).await;
        assert_ne!(first.message.id(), second.message.id());
    }

    #[test]
    fn test_invalid_pattern_rejects_whole_subscription() {
        let board = Blackboard::new();
        let result = board.subscribe("A", ["lab_*", "*lab*"], Arc::new(Recorder::default()));

        assert!(matches!(result, Err(BusError::Pattern { .. })));
        assert_eq!(board.subscription_count(), 0);
    }

    #[test]
    fn test_empty_agent_cannot_subscribe() {
        let board = Blackboard::new();
        let result = board.subscribe("", ["lab_*"], Arc::new(Recorder::default()));
        assert_eq!(result, Err(BusError::Domain(DomainError::EmptyAgentId)));
    }

    #[tokio::test]
    async fn test_question_round_trip() {
        let board = Blackboard::new();
        let lab = Arc::new(Recorder::default());
        let decision = Arc::new(Recorder::default());
        board.subscribe("Lab", ["question_*"], lab.clone()).unwrap();
        board.subscribe("Decision", ["question_*"], decision.clone()).unwrap();

        let handle = board
            .ask_question("Decision", "Do labs support sepsis?", Some(vec!["Lab".into()]))
            .await;
        assert_eq!(handle.topic, "question_1");
        assert_eq!(handle.targets, QuestionTargets::Agents(vec!["Lab".into()]));
        assert_eq!(lab.received(), vec![("question_1".to_string(), json!("Do labs support sepsis?"))]);
        assert!(decision.received().is_empty());

        board
            .respond_to_question("Lab", &handle.topic, "Lactate 2.8 supports it")
            .await
            .unwrap();

        let pending = board.pending_question(handle.id).unwrap();
        assert_eq!(pending.responses.len(), 1);
        assert_eq!(pending.responses[0].agent.as_str(), "Lab");
        assert_eq!(decision.received().len(), 1);
        assert_eq!(board.latest(&handle.topic).unwrap().kind(), MessageKind::Response);
    }

    #[tokio::test]
    async fn test_unanswered_question_stays_pending() {
        let board = Blackboard::new();
        let handle = board.ask_question("Imaging", "Any cardiac history?", None).await;

        assert_eq!(handle.targets, QuestionTargets::All);
        let pending = board.pending_question(handle.id).unwrap();
        assert!(!pending.is_answered());
        assert_eq!(board.summary().questions_asked, 1);
    }

    #[tokio::test]
    async fn test_response_to_unknown_question_is_rejected() {
        let board = Blackboard::new();
        let handle = board.ask_question("A", "q", None).await;
        board.clear();

        let result = board.respond_to_question("B", &handle.topic, "late").await;
        assert_eq!(result.unwrap_err(), BusError::UnknownQuestion("question_1".to_string()));
        assert!(board.conversation_log().is_empty());

        let next = board.ask_question("A", "q2", None).await;
        assert_eq!(next.topic, "question_2");
    }

    #[test]
    fn test_consensus_threshold_and_replacement() {
        let board = Blackboard::new();

        assert_eq!(board.consensus_state("diagnosis"), ConsensusState::NoOpinions);
        assert!(board.post_opinion("A", "diagnosis", "pneumonia", 0.8).unwrap().is_none());
        assert!(board.post_opinion("B", "diagnosis", "pneumonia", 0.7).unwrap().is_none());
        assert_eq!(board.consensus_state("diagnosis"), ConsensusState::Accumulating(2));
        assert!(board.consensus("diagnosis").is_none());

        let record = board
            .post_opinion("C", "diagnosis", "sepsis", 0.9)
            .unwrap()
            .unwrap();
        assert_eq!(record.consensus, "pneumonia");
        assert_eq!(record.supporting_agents, vec![AgentId::new("A"), AgentId::new("B")]);
        assert!((record.confidence - 0.5).abs() < 1e-9);
        assert_eq!(record.dissenting_groups, 1);
        assert_eq!(board.consensus("diagnosis"), Some(record));

        let replaced = board
            .post_opinion("D", "diagnosis", "sepsis", 0.9)
            .unwrap()
            .unwrap();
        assert_eq!(replaced.consensus, "sepsis");
        assert!((replaced.confidence - 0.45).abs() < 1e-9);
        assert_eq!(board.consensus("diagnosis").unwrap().consensus, "sepsis");
        assert!(board.consensus_state("diagnosis").is_evaluated());
    }

    #[test]
    fn test_repost_keeps_single_entry() {
        let board = Blackboard::new();
        board.post_opinion("A", "disposition", "admit to ward", 0.6).unwrap();
        board.post_opinion("A", "disposition", "admit to ICU", 0.9).unwrap();

        let opinions = board.opinions("disposition");
        assert_eq!(opinions.len(), 1);
        assert_eq!(opinions[0].1.statement, "admit to ICU");
        assert_eq!(board.opinion_count("disposition"), 1);
    }

    #[test]
    fn test_repost_below_threshold_does_not_evaluate() {
        let board = Blackboard::new();
        for confidence in [0.1, 0.2, 0.3, 0.4] {
            assert!(board.post_opinion("A", "dx", "x", confidence).unwrap().is_none());
        }
        assert!(board.consensus("dx").is_none());
    }

    #[test]
    fn test_invalid_opinions() {
        let board = Blackboard::new();
        assert!(matches!(
            board.post_opinion("A", "dx", "x", f64::NAN),
            Err(BusError::Domain(DomainError::InvalidConfidence(_)))
        ));
        assert_eq!(
            board.post_opinion("A", "", "x", 0.5),
            Err(BusError::Domain(DomainError::EmptyTopic))
        );
    }

    #[test]
    fn test_custom_classifier_and_threshold() {
        let board = Blackboard::with_config(BusConfig::default().with_consensus_threshold(2))
            .with_classifier(Arc::new(blackboard_domain::CategoryClassifier::clinical()));

        board.post_opinion("A", "dx", "Lobar pneumonia", 0.6).unwrap();
        let record = board
            .post_opinion("B", "dx", "Aspiration pneumonia", 0.6)
            .unwrap()
            .unwrap();
        assert_eq!(record.consensus, "pneumonia");
        assert!(record.is_unanimous());
    }

    #[tokio::test]
    async fn test_clear_resets_session_but_keeps_subscriptions() {
        let board = Blackboard::new();
        let x = Arc::new(Recorder::default());
        board.subscribe("X", ["*"], x.clone()).unwrap();

        finding(&board, "Y", "lab_complete", json!(1)).await;
        board
            .publish("Y", MessageKind::Alert, "sepsis_critical", json!({}), Priority::Critical)
            .await;
        board.ask_question("Y", "anything?", None).await;
        for agent in ["A", "B", "C"] {
            board.post_opinion(agent, "dx", "pneumonia", 0.5).unwrap();
        }

        board.clear();

        assert!(board.latest("lab_complete").is_none());
        assert!(!board.has_alert("sepsis_critical"));
        assert!(board.opinions("dx").is_empty());
        assert!(board.consensus("dx").is_none());
        assert!(board.pending_questions().is_empty());
        assert!(board.conversation_log().is_empty());
        assert_eq!(board.summary(), SessionSummary::default());

        finding(&board, "Y", "lab_complete", json!(2)).await;
        assert_eq!(x.received().len(), 4);
        assert_eq!(board.subscription_count(), 1);
    }

    #[tokio::test]
    async fn test_summary_and_highlights() {
        let board = Blackboard::new();
        board
            .publish("Lab", MessageKind::Alert, "severe_infection_detected", json!({}), Priority::Critical)
            .await;
        board.ask_question("Imaging", "Is WBC elevated?", None).await;
        for agent in ["A", "B", "C"] {
            board.post_opinion(agent, "dx", "pneumonia", 0.5).unwrap();
        }
        board
            .publish("ConsensusBuilder", MessageKind::Consensus, "dx", json!("pneumonia"), Priority::High)
            .await;

        assert_eq!(
            board.summary(),
            SessionSummary {
                total_messages: 3,
                critical_alerts: 1,
                questions_asked: 1,
                consensus_topics: 1,
            }
        );
        let highlights: Vec<String> = board.highlights().iter().map(ToString::to_string).collect();
        assert_eq!(
            highlights,
            vec![
                "ALERT Lab: severe_infection_detected",
                "Imaging asked: Is WBC elevated?",
                "Consensus reached on dx",
            ]
        );
        assert_eq!(board.conversation_for(&"Imaging".into()).len(), 1);
    }
}
