//! Strategy optimizer stage.
//!
//! Pairs the stored performance insights, when present, with a fixed set of
//! content-strategy suggestions. In production this runs on a schedule; the
//! scheduler is an external collaborator, so here the stage subscribes to the
//! performance event instead.

use async_trait::async_trait;
use serde_json::Value;

use crate::contract::events::{StrategySuggestions, StrategyUpdated, topic};
use crate::pipeline::{Event, Stage, StageContext, StageError};
use crate::state::{StateStore, field};

fn suggestions() -> StrategySuggestions {
    StrategySuggestions {
        topics: vec![
            "AI policy updates".to_string(),
            "LLM evaluation best practices".to_string(),
        ],
        recommendations: vec![
            "Post threads at 9 AM UTC".to_string(),
            "Repurpose blog into LinkedIn carousel".to_string(),
        ],
    }
}

/// The strategy optimizer. Subscribes to the performance event.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyOptimizer;

#[async_trait]
impl Stage for StrategyOptimizer {
    fn name(&self) -> &'static str {
        "strategy-optimizer"
    }

    fn subscribes(&self) -> &'static str {
        topic::PERFORMANCE_COMPLETED
    }

    async fn handle(&self, ctx: &StageContext, _input: Value) -> Result<Event, StageError> {
        let insights = ctx
            .store
            .get(&ctx.trace_id, field::PERFORMANCE_INSIGHTS)
            .await?;

        let updated = StrategyUpdated {
            suggestions: suggestions(),
            insights,
        };
        log::info!("strategy update completed (trace {})", ctx.trace_id);
        Ok(Event::new(
            topic::STRATEGY_UPDATED,
            serde_json::to_value(&updated)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MemoryStateStore, StateStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_strategy_includes_stored_insights() {
        let stage = StrategyOptimizer;
        let ctx = StageContext::new(Arc::new(MemoryStateStore::new()));
        ctx.store
            .set(
                &ctx.trace_id,
                field::PERFORMANCE_INSIGHTS,
                json!({"next_best_platform": "twitter"}),
            )
            .await
            .unwrap();

        let event = stage.handle(&ctx, json!({})).await.unwrap();
        assert_eq!(event.topic, topic::STRATEGY_UPDATED);

        let payload: StrategyUpdated = serde_json::from_value(event.data).unwrap();
        assert_eq!(payload.suggestions.topics.len(), 2);
        assert_eq!(
            payload.insights,
            Some(json!({"next_best_platform": "twitter"}))
        );
    }

    #[tokio::test]
    async fn test_strategy_without_stored_insights() {
        let stage = StrategyOptimizer;
        let ctx = StageContext::new(Arc::new(MemoryStateStore::new()));

        let event = stage.handle(&ctx, json!({})).await.unwrap();
        let payload: StrategyUpdated = serde_json::from_value(event.data).unwrap();
        assert!(payload.insights.is_none());
        assert_eq!(payload.suggestions.recommendations.len(), 2);
    }
}
