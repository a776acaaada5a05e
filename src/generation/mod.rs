//! Content generation stage.
//!
//! For each requested platform, in request order and one platform at a time:
//! compose the platform prompt, make one completion attempt, synthesize the
//! deterministic fallback if the service yielded nothing usable, then enforce
//! the per-platform shape contract (single string everywhere, a chunked
//! thread on the microblog platform). The caller never observes which path
//! produced a draft: both persist and emit identically.

pub mod fallback;
pub mod profile;
pub mod prompt;

pub use fallback::FallbackContext;
pub use profile::PlatformProfile;
pub use prompt::compose_prompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::contract::events::{GenerationCompleted, GenerationContext, ResearchCompleted, topic};
use crate::contract::types::{Audience, Draft, DraftSet, Platform, PlatformContent};
use crate::llm::{Completion, CompletionBackend, OfflineCompletion};
use crate::pipeline::{Event, Stage, StageContext, StageError, decode_or_default};
use crate::state::{StateStore, field};
use crate::text::{chunk_chars, clamp_chars};

/// Research text carried into prompts is bounded before composition.
const MAX_RESEARCH_CHARS: usize = 12000;
/// Fixed chunk width and cap for microblog threads.
const TWEET_CHUNK_CHARS: usize = 240;
const MAX_THREAD_TWEETS: usize = 8;

/// Enforces the per-platform shape contract on a produced draft.
///
/// Plain text destined for the microblog platform is chunked into fixed
/// 240-character pieces; a thread produced directly by fallback synthesis is
/// only capped. Every other platform passes through unchanged.
fn shape_for_platform(platform: &Platform, draft: Draft) -> Draft {
    if !platform.is_thread() {
        return draft;
    }
    match draft {
        Draft::Single(text) => {
            Draft::Thread(chunk_chars(&text, TWEET_CHUNK_CHARS, MAX_THREAD_TWEETS))
        }
        Draft::Thread(tweets) => {
            Draft::Thread(tweets.into_iter().take(MAX_THREAD_TWEETS).collect())
        }
    }
}

/// The generation stage. Subscribes to the research event.
pub struct GenerationStage {
    completion: Arc<dyn CompletionBackend>,
}

impl GenerationStage {
    pub fn new(completion: Arc<dyn CompletionBackend>) -> Self {
        Self { completion }
    }

    /// A stage with the disabled completion collaborator: every platform is
    /// served by fallback synthesis.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineCompletion))
    }

    /// Produces one draft per requested platform, preserving request order.
    pub async fn produce_drafts(
        &self,
        topic: &str,
        audience: &Audience,
        insights: &[String],
        research_text: &str,
        platforms: &[String],
    ) -> DraftSet {
        let mut drafts = DraftSet::new();

        for requested in platforms {
            let platform = Platform::parse(requested);
            let profile = PlatformProfile::for_platform(&platform);

            let prompt = compose_prompt(&platform, topic, audience, insights, research_text);
            let completion = self.completion.complete(&prompt, &profile.params).await;

            let draft = match completion {
                Completion::Produced(text) if !text.trim().is_empty() => Draft::Single(text),
                Completion::Produced(_) => {
                    log::info!(
                        "completion for {} produced empty text, synthesizing fallback",
                        requested
                    );
                    (profile.fallback)(&FallbackContext {
                        topic,
                        audience,
                        insights,
                    })
                }
                Completion::Unavailable => {
                    log::info!(
                        "completion unavailable for {}, synthesizing fallback",
                        requested
                    );
                    (profile.fallback)(&FallbackContext {
                        topic,
                        audience,
                        insights,
                    })
                }
            };

            drafts.push(requested.clone(), shape_for_platform(&platform, draft));
        }

        drafts
    }
}

#[async_trait]
impl Stage for GenerationStage {
    fn name(&self) -> &'static str {
        "content-generator"
    }

    fn subscribes(&self) -> &'static str {
        topic::RESEARCH_COMPLETED
    }

    async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError> {
        let input: ResearchCompleted = decode_or_default(input);

        let topic_name = if input.research.topic.is_empty() {
            input.topic.clone()
        } else {
            input.research.topic.clone()
        };
        let research_text = clamp_chars(&input.research.full_text, MAX_RESEARCH_CHARS);
        let platforms = if input.target_platforms.is_empty() {
            vec!["blog".to_string()]
        } else {
            input.target_platforms.clone()
        };

        let drafts = self
            .produce_drafts(
                &topic_name,
                &input.audience,
                &input.research.insights,
                &research_text,
                &platforms,
            )
            .await;

        let rendered = drafts.to_value();
        ctx.store
            .set(&ctx.trace_id, field::GENERATED_CONTENT, rendered.clone())
            .await?;
        // Dual naming kept for compatibility: downstream consumers read either.
        ctx.store
            .set(&ctx.trace_id, field::ARTIFACT_DRAFTS, rendered)
            .await?;

        log::info!(
            "content-generator produced {} drafts for topic {:?}",
            drafts.len(),
            topic_name
        );

        let completed = GenerationCompleted {
            platform_contents: PlatformContent::from_drafts(&drafts),
            context: GenerationContext {
                topic: topic_name,
                audience: input.audience,
            },
        };
        Ok(Event::new(
            topic::GENERATION_COMPLETED,
            serde_json::to_value(&completed)?,
        ))
    }
}
