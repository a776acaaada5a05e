//! Event topics and the payloads stages exchange over them.
//!
//! The dispatcher that routes these events is an external collaborator; this
//! module only pins down the names and shapes both sides must agree on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::types::{
    Audience, MetricSet, PerformanceInsight, PlatformContent, ResearchPayload,
};

/// Topic names the pipeline subscribes to and emits.
pub mod topic {
    /// Inbound request accepted; drives the research stage.
    pub const CONTENT_REQUEST_RECEIVED: &str = "content.request.received";
    /// Research payload ready; drives the generation stage.
    pub const RESEARCH_COMPLETED: &str = "content.research.completed";
    /// Drafts ready; drives quality assurance and, downstream, publishing.
    pub const GENERATION_COMPLETED: &str = "content.generation.completed";
    /// Quality checks passed.
    pub const QA_COMPLETED: &str = "content.qa.completed";
    /// Quality checks failed.
    pub const QA_FAILED: &str = "content.qa.failed";
    /// Emitted by the external publishing collaborator; drives performance.
    pub const CONTENT_PUBLISHED: &str = "content.published";
    /// Metrics and recommendation ready.
    pub const PERFORMANCE_COMPLETED: &str = "performance.analysis.completed";
    /// Strategy suggestions ready.
    pub const STRATEGY_UPDATED: &str = "strategy.update.completed";
}

/// Payload of [`topic::CONTENT_REQUEST_RECEIVED`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequested {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, rename = "targetPlatforms")]
    pub target_platforms: Vec<String>,
    #[serde(default, rename = "sourceUrl", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Payload of [`topic::RESEARCH_COMPLETED`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchCompleted {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub research: ResearchPayload,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, rename = "targetPlatforms")]
    pub target_platforms: Vec<String>,
}

/// Context block carried on the generation event for downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub audience: Audience,
}

/// Payload of [`topic::GENERATION_COMPLETED`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationCompleted {
    #[serde(default, rename = "platformContents")]
    pub platform_contents: PlatformContent,
    #[serde(default)]
    pub context: GenerationContext,
}

/// Payload of [`topic::CONTENT_PUBLISHED`].
///
/// The publish result shapes belong to the external publisher; this stage
/// treats them as opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPublished {
    #[serde(default)]
    pub results: Value,
}

/// Payload of [`topic::PERFORMANCE_COMPLETED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCompleted {
    pub metrics: MetricSet,
    pub insights: PerformanceInsight,
}

/// Fixed suggestion block emitted by the strategy optimizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySuggestions {
    pub topics: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Payload of [`topic::STRATEGY_UPDATED`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyUpdated {
    pub suggestions: StrategySuggestions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_research_requested_tolerates_partial_payloads() {
        let requested: ResearchRequested = serde_json::from_value(json!({
            "topic": "Rust pipelines"
        }))
        .unwrap();
        assert_eq!(requested.topic, "Rust pipelines");
        assert!(requested.target_platforms.is_empty());
        assert!(requested.source_url.is_none());
    }

    #[test]
    fn test_generation_completed_wire_shape() {
        let value = json!({
            "platformContents": {
                "blog": "a post",
                "twitter": ["one", "two"]
            },
            "context": {"topic": "t", "audience": {"persona": "devs"}}
        });
        let event: GenerationCompleted = serde_json::from_value(value).unwrap();
        assert_eq!(event.platform_contents.blog.as_deref(), Some("a post"));
        assert_eq!(event.platform_contents.twitter.len(), 2);
        assert_eq!(event.context.audience.persona, "devs");

        let back = serde_json::to_value(&event).unwrap();
        assert!(back.get("platformContents").is_some());
    }
}
