//! Shared data and event contracts for the content pipeline.
//!
//! Everything a stage produces is immutable for every stage downstream of it:
//! stages read payloads and build new ones, they never mutate in place.

pub mod events;
pub mod types;

pub use events::{
    ContentPublished, GenerationCompleted, GenerationContext, PerformanceCompleted,
    ResearchCompleted, ResearchRequested, StrategySuggestions, StrategyUpdated,
};
pub use types::{
    Audience, ContentRequest, Draft, DraftSet, MetricSet, PerformanceInsight, Platform,
    PlatformContent, ResearchPayload, Urgency,
};
