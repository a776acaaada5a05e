//! Live fetch and search collaborators (feature `web`).
//!
//! Both are single-attempt, bounded clients: one request, a fixed timeout,
//! and no retries. The research stage swallows their errors per URL.

use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::json;

use crate::research::{PageFetcher, ResearchError, SearchProvider};
use crate::text::clamp_chars;

const FETCH_TIMEOUT: Duration = Duration::from_secs(12);
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_PAGE_CHARS: usize = 12000;
const USER_AGENT: &str = concat!("draftsmith/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Page fetching
// ============================================================================

/// Reqwest-backed page fetcher with scraper-based text extraction.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ResearchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ResearchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(extract_readable_text(&body, MAX_PAGE_CHARS))
    }
}

/// Extracts visible text from an HTML document.
///
/// Script, style, and noscript content is skipped; the parser decodes
/// entities; all remaining text nodes collapse to single-spaced text capped
/// at `max_chars` characters.
pub fn extract_readable_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut collected = String::new();

    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| {
                        matches!(element.name(), "script" | "style" | "noscript")
                    })
            });
            if !hidden {
                collected.push_str(&text.text);
                collected.push(' ');
            }
        }
    }

    let collapsed = collected.split_whitespace().collect::<Vec<_>>().join(" ");
    clamp_chars(&collapsed, max_chars)
}

// ============================================================================
// Search
// ============================================================================

/// Configuration for the search provider.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// API key for the search service. `None` disables the provider.
    pub api_key: Option<String>,
    /// Search endpoint (default: https://api.exa.ai/search)
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.exa.ai/search".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    url: String,
}

/// Reqwest-backed search provider.
pub struct HttpSearchProvider {
    client: reqwest::Client,
    config: SearchConfig,
}

impl HttpSearchProvider {
    pub fn new(config: SearchConfig) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, ResearchError> {
        let api_key = self.config.api_key.as_deref().ok_or(ResearchError::Disabled)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&json!({"query": query, "numResults": limit}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResearchError::Status {
                status: response.status().as_u16(),
                url: self.config.endpoint.clone(),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .results
            .into_iter()
            .take(limit)
            .map(|hit| hit.url)
            .collect())
    }
}
