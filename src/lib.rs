//! # Draftsmith
//!
//! A degradation-tolerant content-creation pipeline: topic research,
//! platform-aware draft generation, and performance tracking as composable
//! async stages.
//!
//! ## Features
//!
//! - **Event-driven stages**: each stage is triggered by one named event,
//!   reads and writes a keyed state store under a correlation key, and emits
//!   exactly one outward event on success
//! - **Graceful degradation**: every external dependency (search, page fetch,
//!   completion service) is optional; its absence or failure degrades to a
//!   deterministic fallback instead of an error
//! - **Dual-path generation**: platform-tailored prompts against a completion
//!   service, with platform-native fallback synthesis that produces the same
//!   shapes when the service yields nothing
//! - **Pick-and-choose networking**: the reqwest-backed collaborators are
//!   feature-gated (`llm`, `web`); the core pipeline is dependency-light
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use draftsmith::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // No live capabilities: research degrades to placeholder sentences
//!     // and generation to deterministic fallback synthesis.
//!     let pipeline = Pipeline::new()
//!         .register(ResearchStage::offline())
//!         .register(GenerationStage::offline())
//!         .register(QualityAssuranceStage)
//!         .register(PerformanceStage::default())
//!         .register(StrategyOptimizer);
//!
//!     let ctx = StageContext::new(Arc::new(MemoryStateStore::new()));
//!     let request = ContentRequest {
//!         topic: Some("Rust async pipelines".to_string()),
//!         source_url: None,
//!         target_platforms: vec!["blog".to_string(), "twitter".to_string()],
//!         urgency: Urgency::Normal,
//!         audience: Audience::default(),
//!     };
//!
//!     let kickoff = RequestIntake::accept(&ctx, request).await.unwrap();
//!     let trail = pipeline.dispatch(&ctx, kickoff).await.unwrap();
//!     assert!(trail.iter().any(|event| event.topic == topic::QA_COMPLETED));
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`contract`]: data model and event contracts shared by every stage
//! - [`pipeline`]: the stage trait, execution context, and event dispatcher
//! - [`state`]: the keyed state store interface
//! - [`research`], [`generation`], [`qa`], [`performance`], [`strategy`]:
//!   the stages, in pipeline order
//! - [`intake`]: inbound request validation and kickoff
//! - [`llm`]: the completion service client
//! - [`prelude`]: commonly used types (import with `use draftsmith::prelude::*`)

// ============================================================================
// Modules
// ============================================================================

pub mod contract;
pub mod generation;
pub mod intake;
pub mod llm;
pub mod performance;
pub mod pipeline;
pub mod qa;
pub mod research;
pub mod state;
pub mod strategy;

mod text;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

pub use contract::events::topic;
pub use contract::types::{
    Audience, ContentRequest, Draft, DraftSet, MetricSet, PerformanceInsight, Platform,
    PlatformContent, ResearchPayload, Urgency,
};
pub use generation::{GenerationStage, PlatformProfile, compose_prompt};
pub use intake::{RequestError, RequestIntake};
pub use llm::{Completion, CompletionBackend, GenerationParams, OfflineCompletion};
pub use performance::{MetricsCollector, PerformanceStage, StubMetricsCollector};
pub use pipeline::{Event, Pipeline, Stage, StageContext, StageError};
pub use qa::QualityAssuranceStage;
pub use research::{PageFetcher, ResearchStage, SearchProvider};
pub use state::{MemoryStateStore, StateStore};
pub use strategy::StrategyOptimizer;

#[cfg(feature = "llm")]
pub use llm::{CompletionConfig, OpenAiCompletion};

#[cfg(feature = "web")]
pub use research::web::{HttpPageFetcher, HttpSearchProvider, SearchConfig};

// ============================================================================
// Prelude - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything you need to assemble and run the
/// pipeline.
///
/// # Example
/// ```rust
/// use draftsmith::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        Audience,
        Completion,
        CompletionBackend,
        ContentRequest,
        Draft,
        DraftSet,
        Event,
        GenerationParams,
        // Stages
        GenerationStage,
        MemoryStateStore,
        MetricsCollector,
        OfflineCompletion,
        PageFetcher,
        PerformanceInsight,
        PerformanceStage,
        // Core
        Pipeline,
        Platform,
        PlatformContent,
        QualityAssuranceStage,
        RequestIntake,
        ResearchPayload,
        ResearchStage,
        SearchProvider,
        Stage,
        StageContext,
        StageError,
        StateStore,
        StrategyOptimizer,
        StubMetricsCollector,
        Urgency,
        // Events
        topic,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
