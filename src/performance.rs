//! Performance tracking stage.
//!
//! Collects per-platform engagement metrics through a collaborator and
//! applies a one-rule heuristic to recommend the next platform to
//! prioritize. The shipped collector is a stub with fixed values; the real
//! platform APIs slot in behind [`MetricsCollector`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::contract::events::{ContentPublished, PerformanceCompleted, topic};
use crate::contract::types::{MetricSet, PerformanceInsight};
use crate::pipeline::{Event, Stage, StageContext, StageError, decode_or_default};
use crate::state::{StateStore, field};

const IMPRESSION_THRESHOLD: f64 = 1000.0;
const STRATEGY: &str = "Increase thread depth and add visual";

/// Collects per-platform engagement metrics for published content.
#[async_trait]
pub trait MetricsCollector: Send + Sync {
    async fn collect(&self, publish_results: &Value) -> MetricSet;
}

/// Fixed-value collector standing in for the platform APIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubMetricsCollector;

fn counters(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[async_trait]
impl MetricsCollector for StubMetricsCollector {
    async fn collect(&self, _publish_results: &Value) -> MetricSet {
        let mut metrics = MetricSet::new();
        metrics.insert(
            "twitter".to_string(),
            counters(&[("impressions", 1200.0), ("engagement_rate", 0.032)]),
        );
        metrics.insert(
            "linkedin".to_string(),
            counters(&[("views", 800.0), ("clicks", 40.0)]),
        );
        metrics.insert(
            "wordpress".to_string(),
            counters(&[("reads", 560.0), ("avg_time", 78.0)]),
        );
        metrics.insert(
            "medium".to_string(),
            counters(&[("reads", 420.0), ("claps", 55.0)]),
        );
        metrics
    }
}

/// The one-rule heuristic: prioritize the microblog platform while its
/// impressions clear the threshold, otherwise the professional network.
pub fn analyze(metrics: &MetricSet) -> PerformanceInsight {
    let impressions = metrics
        .get("twitter")
        .and_then(|platform| platform.get("impressions"))
        .copied()
        .unwrap_or(0.0);

    let next_best_platform = if impressions > IMPRESSION_THRESHOLD {
        "twitter"
    } else {
        "linkedin"
    };

    PerformanceInsight {
        next_best_platform: next_best_platform.to_string(),
        strategy: STRATEGY.to_string(),
    }
}

/// The performance stage. Subscribes to the published event.
pub struct PerformanceStage {
    collector: Arc<dyn MetricsCollector>,
}

impl PerformanceStage {
    pub fn new(collector: Arc<dyn MetricsCollector>) -> Self {
        Self { collector }
    }
}

impl Default for PerformanceStage {
    fn default() -> Self {
        Self::new(Arc::new(StubMetricsCollector))
    }
}

#[async_trait]
impl Stage for PerformanceStage {
    fn name(&self) -> &'static str {
        "performance-tracker"
    }

    fn subscribes(&self) -> &'static str {
        topic::CONTENT_PUBLISHED
    }

    async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError> {
        let published: ContentPublished = decode_or_default(input);

        let metrics = self.collector.collect(&published.results).await;
        let insights = analyze(&metrics);

        ctx.store
            .set(
                &ctx.trace_id,
                field::PERFORMANCE_METRICS,
                serde_json::to_value(&metrics)?,
            )
            .await?;
        ctx.store
            .set(
                &ctx.trace_id,
                field::PERFORMANCE_INSIGHTS,
                serde_json::to_value(&insights)?,
            )
            .await?;

        log::info!(
            "performance analysis completed (trace {}): next best platform {}",
            ctx.trace_id,
            insights.next_best_platform
        );

        let completed = PerformanceCompleted { metrics, insights };
        Ok(Event::new(
            topic::PERFORMANCE_COMPLETED,
            serde_json::to_value(&completed)?,
        ))
    }
}
