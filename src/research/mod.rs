//! Topic research stage.
//!
//! Given a topic or a source URL, obtains raw text (direct fetch,
//! search-then-fetch, or static fallback sentences), extracts short insight
//! snippets, and persists a [`ResearchPayload`] before emitting the research
//! event. Both live capabilities are optional at runtime: running without
//! them is a supported configuration, not an error, and per-URL failures are
//! swallowed so a dead link never fails the stage.

#[cfg(feature = "web")]
pub mod web;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use thiserror::Error;

use crate::contract::events::{ResearchCompleted, ResearchRequested, topic};
use crate::contract::types::{LOCAL_FALLBACK_SOURCE, ResearchPayload};
use crate::pipeline::{Event, Stage, StageContext, StageError, decode_or_default};
use crate::state::{StateStore, field};
use crate::text::clamp_chars;

/// Search query suffix restricting results to trusted domains.
const TRUSTED_SITES: &str = "site:wikipedia.org OR site:medium.com OR site:nytimes.com";

/// How many search results to fetch, and how many texts feed insight
/// derivation.
const MAX_SEARCH_RESULTS: usize = 5;
const MAX_INSIGHT_TEXTS: usize = 5;
const MAX_INSIGHTS_PER_TEXT: usize = 3;
const MAX_INSIGHTS: usize = 8;
const MIN_SENTENCE_CHARS: usize = 40;
const SNIPPET_FALLBACK_CHARS: usize = 220;
const MAX_FULL_TEXT_CHARS: usize = 20000;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[cfg(feature = "web")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch of {url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("search provider has no credential configured")]
    Disabled,
}

/// Retrieves one page and extracts its readable text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, ResearchError>;
}

/// Issues one search query and returns result URLs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ResearchError>;
}

// ============================================================================
// Insight derivation
// ============================================================================

/// Extracts up to eight short insight snippets from the collected texts.
///
/// `?` counts as a sentence terminator. Sentences longer than 40 characters
/// qualify, at most three per text; a text with no qualifying sentence
/// contributes its first 220 characters with a truncation marker instead.
pub fn derive_insights(texts: &[String]) -> Vec<String> {
    let mut insights = Vec::new();
    for text in texts.iter().take(MAX_INSIGHT_TEXTS) {
        let normalized = text.replace('?', ".");
        let qualifying: Vec<String> = normalized
            .split('.')
            .map(str::trim)
            .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
            .take(MAX_INSIGHTS_PER_TEXT)
            .map(str::to_string)
            .collect();

        if qualifying.is_empty() {
            if text.chars().count() > SNIPPET_FALLBACK_CHARS {
                insights.push(format!("{}…", clamp_chars(text, SNIPPET_FALLBACK_CHARS)));
            } else {
                insights.push(text.clone());
            }
        } else {
            insights.extend(qualifying);
        }
    }
    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Naive title approximation: the first ten whitespace-separated tokens.
pub fn infer_topic(texts: &[String]) -> String {
    texts
        .first()
        .map(|text| {
            text.split_whitespace()
                .take(10)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// The static placeholder texts used when no live source was reachable.
pub fn placeholder_texts(topic: &str) -> Vec<String> {
    vec![
        format!("Background overview about {}.", topic),
        format!("Recent developments related to {}.", topic),
        format!("Key considerations and best practices for {}.", topic),
    ]
}

// ============================================================================
// Stage
// ============================================================================

/// The research stage. Subscribes to the inbound request event.
pub struct ResearchStage {
    fetcher: Option<Arc<dyn PageFetcher>>,
    search: Option<Arc<dyn SearchProvider>>,
}

impl ResearchStage {
    /// A stage with no live capability: every request degrades to the static
    /// placeholder payload.
    pub fn offline() -> Self {
        Self {
            fetcher: None,
            search: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Collects raw texts and their sources, in strict priority order:
    /// explicit source URL first, search-then-fetch second, static
    /// placeholders last.
    async fn gather(&self, topic: &str, source_url: Option<&str>) -> (Vec<String>, Vec<String>) {
        let mut sources: Vec<String> = Vec::new();
        let mut texts: Vec<String> = Vec::new();

        if let (Some(url), Some(fetcher)) = (source_url, &self.fetcher) {
            sources.push(url.to_string());
            match fetcher.fetch_text(url).await {
                Ok(text) if !text.is_empty() => texts.push(text),
                Ok(_) => {}
                Err(err) => log::debug!("fetch of {} failed: {}", url, err),
            }
        } else if let (Some(search), Some(fetcher)) = (&self.search, &self.fetcher) {
            if !topic.is_empty() {
                let query = format!("{} {}", topic, TRUSTED_SITES);
                sources = match search.search(&query, MAX_SEARCH_RESULTS).await {
                    Ok(urls) => urls.into_iter().take(MAX_SEARCH_RESULTS).collect(),
                    Err(err) => {
                        log::debug!("search for {:?} failed: {}", topic, err);
                        Vec::new()
                    }
                };

                // One fetch at a time; a slow page delays the rest, but the
                // stage stays within one logical task.
                let fetched: Vec<String> = stream::iter(sources.clone())
                    .then(|url| {
                        let fetcher = Arc::clone(fetcher);
                        async move {
                            match fetcher.fetch_text(&url).await {
                                Ok(text) => text,
                                Err(err) => {
                                    log::debug!("fetch of {} failed: {}", url, err);
                                    String::new()
                                }
                            }
                        }
                    })
                    .collect()
                    .await;
                texts.extend(fetched.into_iter().filter(|text| !text.is_empty()));
            }
        }

        if texts.is_empty() {
            texts = placeholder_texts(topic);
            sources = vec![LOCAL_FALLBACK_SOURCE.to_string()];
        }

        (texts, sources)
    }
}

#[async_trait]
impl Stage for ResearchStage {
    fn name(&self) -> &'static str {
        "topic-research"
    }

    fn subscribes(&self) -> &'static str {
        topic::CONTENT_REQUEST_RECEIVED
    }

    async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError> {
        let request: ResearchRequested = decode_or_default(input);

        let (texts, sources) = self
            .gather(&request.topic, request.source_url.as_deref())
            .await;

        let topic_name = if request.topic.is_empty() {
            infer_topic(&texts)
        } else {
            request.topic.clone()
        };

        let insights = derive_insights(&texts);
        let full_text = clamp_chars(&texts.join("\n"), MAX_FULL_TEXT_CHARS);

        let research = ResearchPayload {
            topic: topic_name.clone(),
            insights,
            sources,
            full_text,
        };

        log::info!(
            "topic-research prepared payload: topic={:?}, sources={}, insights={}",
            research.topic,
            research.sources.len(),
            research.insights.len()
        );

        ctx.store
            .set(
                &ctx.trace_id,
                field::RESEARCH,
                serde_json::to_value(&research)?,
            )
            .await?;

        let completed = ResearchCompleted {
            topic: topic_name,
            research,
            audience: request.audience,
            target_platforms: request.target_platforms,
        };
        Ok(Event::new(
            topic::RESEARCH_COMPLETED,
            serde_json::to_value(&completed)?,
        ))
    }
}
