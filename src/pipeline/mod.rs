//! Stage contract and event-chain dispatching.
//!
//! A stage is a unit of work triggered by exactly one named event. It reads
//! and writes the keyed state store under the execution's correlation key and
//! emits exactly one outward event on success. Degradation inside a stage
//! (missing capability, transient external failure) is invisible at this
//! boundary: the stage still persists a result and still emits.
//!
//! [`Pipeline`] is a minimal in-process dispatcher for local runs and tests:
//! it routes an event to the stage subscribed to its topic and follows the
//! emitted event until no subscriber remains. Production deployments are
//! expected to wire stages to a real event bus instead.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::state::{StateError, StateStore};

// ============================================================================
// Events
// ============================================================================

/// A named event with a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub topic: String,
    pub data: Value,
}

impl Event {
    pub fn new(topic: impl Into<String>, data: Value) -> Self {
        Self {
            topic: topic.into(),
            data,
        }
    }
}

// ============================================================================
// Stage contract
// ============================================================================

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-execution context handed to every stage invocation.
///
/// The correlation key is opaque and owned by the dispatcher; contexts built
/// with [`StageContext::new`] mint a fresh v4 UUID for local runs.
#[derive(Clone)]
pub struct StageContext {
    pub trace_id: String,
    pub store: Arc<dyn StateStore>,
}

impl StageContext {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            store,
        }
    }

    pub fn with_trace_id(store: Arc<dyn StateStore>, trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            store,
        }
    }
}

/// An event-triggered unit of the pipeline.
///
/// Implementations must tolerate any input payload: missing or malformed
/// fields decode to their defaults rather than failing the invocation.
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    /// Stable stage name used in logs.
    fn name(&self) -> &'static str;

    /// The event topic that triggers this stage.
    fn subscribes(&self) -> &'static str;

    /// Handles one triggering event and returns the single outward event.
    async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError>;
}

/// Tolerant payload decode: malformed input degrades to defaults instead of
/// failing the stage.
pub(crate) fn decode_or_default<T: serde::de::DeserializeOwned + Default>(input: Value) -> T {
    match serde_json::from_value(input) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("malformed stage payload, using defaults: {}", err);
            T::default()
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes events to subscribed stages and follows the emitted chain.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stage. A later registration for the same topic shadows an
    /// earlier one, with a warning logged.
    pub fn register<S: Stage>(mut self, stage: S) -> Self {
        if self
            .stages
            .iter()
            .any(|existing| existing.subscribes() == stage.subscribes())
        {
            log::warn!(
                "Warning: a stage is already subscribed to {}, the new registration takes precedence.",
                stage.subscribes()
            );
        }
        self.stages.insert(0, Arc::new(stage));
        self
    }

    /// The stage subscribed to a topic, if any.
    pub fn subscriber(&self, topic: &str) -> Option<&Arc<dyn Stage>> {
        self.stages.iter().find(|stage| stage.subscribes() == topic)
    }

    /// Dispatches an event and follows the emitted chain until no stage
    /// subscribes to the latest topic. Returns every event seen, in order,
    /// starting with the one passed in.
    pub async fn dispatch(
        &self,
        ctx: &StageContext,
        event: Event,
    ) -> Result<Vec<Event>, StageError> {
        let mut trail = Vec::new();
        let mut current = Some(event);

        while let Some(event) = current {
            let next = match self.subscriber(&event.topic) {
                Some(stage) => {
                    log::info!(
                        "dispatching {} to stage {} (trace {})",
                        event.topic,
                        stage.name(),
                        ctx.trace_id
                    );
                    Some(stage.handle(ctx, event.data.clone()).await?)
                }
                None => None,
            };
            trail.push(event);
            current = next;
        }

        Ok(trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use serde_json::json;

    struct RelayStage {
        name: &'static str,
        subscribes: &'static str,
        emits: &'static str,
    }

    #[async_trait]
    impl Stage for RelayStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn subscribes(&self) -> &'static str {
            self.subscribes
        }

        async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError> {
            ctx.store
                .set(&ctx.trace_id, self.name, json!(true))
                .await?;
            Ok(Event::new(self.emits, input))
        }
    }

    fn context() -> StageContext {
        StageContext::new(Arc::new(MemoryStateStore::new()))
    }

    #[tokio::test]
    async fn test_dispatch_follows_emitted_chain() {
        let pipeline = Pipeline::new()
            .register(RelayStage {
                name: "first",
                subscribes: "a",
                emits: "b",
            })
            .register(RelayStage {
                name: "second",
                subscribes: "b",
                emits: "c",
            });

        let ctx = context();
        let trail = pipeline
            .dispatch(&ctx, Event::new("a", json!({"n": 1})))
            .await
            .unwrap();

        let topics: Vec<&str> = trail.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["a", "b", "c"]);
        assert_eq!(
            ctx.store.get(&ctx.trace_id, "first").await.unwrap(),
            Some(json!(true))
        );
        assert_eq!(
            ctx.store.get(&ctx.trace_id, "second").await.unwrap(),
            Some(json!(true))
        );
    }

    #[tokio::test]
    async fn test_dispatch_without_subscriber_returns_single_event() {
        let pipeline = Pipeline::new();
        let ctx = context();
        let trail = pipeline
            .dispatch(&ctx, Event::new("nobody.listens", json!(null)))
            .await
            .unwrap();
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_decode_or_default_tolerates_malformed_payloads() {
        use crate::contract::ResearchRequested;

        let decoded: ResearchRequested = decode_or_default(json!("not an object"));
        assert_eq!(decoded, ResearchRequested::default());

        let decoded: ResearchRequested = decode_or_default(json!({"topic": "ok"}));
        assert_eq!(decoded.topic, "ok");
    }

    #[test]
    fn test_contexts_mint_distinct_trace_ids() {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStateStore::new());
        let a = StageContext::new(store.clone());
        let b = StageContext::new(store);
        assert_ne!(a.trace_id, b.trace_id);
    }
}
