//! Core data model shared by every stage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Audience
// ============================================================================

/// Who the content is written for.
///
/// An `Audience` is an immutable input: it is carried through research,
/// generation, and performance tracking unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    /// A short persona description, e.g. "startup CTOs".
    #[serde(default = "Audience::default_persona")]
    pub persona: String,
    /// ISO language code the drafts should be written in.
    #[serde(default = "Audience::default_language")]
    pub language: String,
    /// Target reading level, e.g. "beginner", "intermediate", "expert".
    #[serde(default = "Audience::default_reading_level", rename = "readingLevel")]
    pub reading_level: String,
}

impl Audience {
    fn default_persona() -> String {
        "general audience".to_string()
    }

    fn default_language() -> String {
        "en".to_string()
    }

    fn default_reading_level() -> String {
        "intermediate".to_string()
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self {
            persona: Self::default_persona(),
            language: Self::default_language(),
            reading_level: Self::default_reading_level(),
        }
    }
}

// ============================================================================
// Research payload
// ============================================================================

/// The raw material the research stage hands to generation.
///
/// Created exactly once per workflow execution and read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchPayload {
    #[serde(default)]
    pub topic: String,
    /// Short extracted snippets, at most eight.
    #[serde(default)]
    pub insights: Vec<String>,
    /// Source URLs, or the single sentinel `"local:fallback"` when no live
    /// source was reachable.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Concatenated source text, capped at 20000 characters.
    #[serde(default, rename = "fullText")]
    pub full_text: String,
}

/// Sentinel recorded as the sole source when research ran without any live
/// capability.
pub const LOCAL_FALLBACK_SOURCE: &str = "local:fallback";

// ============================================================================
// Platforms
// ============================================================================

/// A target content channel.
///
/// Parsing never fails: identifiers outside the four known channels land in
/// [`Platform::Other`] and receive default handling (generic guidance, default
/// generation parameters, generic fallback) everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Blog,
    Linkedin,
    Newsletter,
    /// The microblog platform. The only platform whose draft is a sequence of
    /// short strings rather than a single string.
    Twitter,
    Other(String),
}

impl Platform {
    /// Parses a platform identifier, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "blog" => Platform::Blog,
            "linkedin" => Platform::Linkedin,
            "newsletter" => Platform::Newsletter,
            "twitter" => Platform::Twitter,
            _ => Platform::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Blog => "blog",
            Platform::Linkedin => "linkedin",
            Platform::Newsletter => "newsletter",
            Platform::Twitter => "twitter",
            Platform::Other(name) => name,
        }
    }

    /// Whether this platform's draft contract is a thread (sequence of short
    /// strings) rather than a single string.
    pub fn is_thread(&self) -> bool {
        matches!(self, Platform::Twitter)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// A generated artifact for one platform.
///
/// The shape is a per-platform contract: every platform except the microblog
/// platform always yields [`Draft::Single`]; the microblog platform always
/// yields [`Draft::Thread`] after post-processing. Callers branch on platform
/// identity to know which variant to expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Draft {
    Single(String),
    Thread(Vec<String>),
}

impl Draft {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Draft::Single(text) => Some(text),
            Draft::Thread(_) => None,
        }
    }

    pub fn as_thread(&self) -> Option<&[String]> {
        match self {
            Draft::Single(_) => None,
            Draft::Thread(tweets) => Some(tweets),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Draft::Single(text) => text.is_empty(),
            Draft::Thread(tweets) => tweets.is_empty(),
        }
    }
}

/// Per-platform drafts in the caller's requested order.
///
/// The requested order is part of the generation contract, so this is an
/// ordered pair sequence rather than a map. The JSON object written to the
/// state store carries the same entries but no ordering guarantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSet {
    entries: Vec<(String, Draft)>,
}

impl DraftSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, platform: impl Into<String>, draft: Draft) {
        self.entries.push((platform.into(), draft));
    }

    /// Looks a draft up by the platform string it was requested under.
    pub fn get(&self, platform: &str) -> Option<&Draft> {
        self.entries
            .iter()
            .find(|(name, _)| name == platform)
            .map(|(_, draft)| draft)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Draft)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the set as a JSON object for the state store.
    pub fn to_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (platform, draft) in &self.entries {
            let value = serde_json::to_value(draft).unwrap_or(serde_json::Value::Null);
            map.insert(platform.clone(), value);
        }
        serde_json::Value::Object(map)
    }
}

// ============================================================================
// Platform content slots
// ============================================================================

/// The four known platform slots of the generation event payload.
///
/// Slots for platforms that were not requested stay absent; the microblog slot
/// defaults to an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    #[serde(default)]
    pub twitter: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter: Option<String>,
}

impl PlatformContent {
    /// Fills the known slots from a draft set, honoring the per-platform shape
    /// contract. Drafts for unrecognized platforms have no slot and are only
    /// visible through the persisted draft set.
    pub fn from_drafts(drafts: &DraftSet) -> Self {
        let mut content = PlatformContent::default();
        for (name, draft) in drafts.iter() {
            match Platform::parse(name) {
                Platform::Blog => content.blog = draft.as_single().map(str::to_string),
                Platform::Linkedin => content.linkedin = draft.as_single().map(str::to_string),
                Platform::Newsletter => {
                    content.newsletter = draft.as_single().map(str::to_string)
                }
                Platform::Twitter => {
                    content.twitter = draft.as_thread().map(<[String]>::to_vec).unwrap_or_default()
                }
                Platform::Other(_) => {}
            }
        }
        content
    }
}

// ============================================================================
// Performance
// ============================================================================

/// Per-platform engagement counters keyed by platform name.
pub type MetricSet = HashMap<String, HashMap<String, f64>>;

/// The performance stage's recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsight {
    pub next_best_platform: String,
    pub strategy: String,
}

// ============================================================================
// Inbound request
// ============================================================================

/// Scheduling hint carried on the inbound request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
}

/// An inbound content-creation request, before the pipeline owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, rename = "sourceUrl", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(rename = "targetPlatforms")]
    pub target_platforms: Vec<String>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub audience: Audience,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audience_defaults_fill_missing_fields() {
        let audience: Audience = serde_json::from_value(json!({})).unwrap();
        assert_eq!(audience.persona, "general audience");
        assert_eq!(audience.language, "en");
        assert_eq!(audience.reading_level, "intermediate");
    }

    #[test]
    fn test_audience_wire_names() {
        let audience: Audience = serde_json::from_value(json!({
            "persona": "indie founders",
            "language": "fr",
            "readingLevel": "expert"
        }))
        .unwrap();
        assert_eq!(audience.reading_level, "expert");

        let value = serde_json::to_value(&audience).unwrap();
        assert!(value.get("readingLevel").is_some());
    }

    #[test]
    fn test_research_payload_wire_names() {
        let payload: ResearchPayload = serde_json::from_value(json!({
            "topic": "quantum batteries",
            "insights": ["a"],
            "sources": ["local:fallback"],
            "fullText": "body"
        }))
        .unwrap();
        assert_eq!(payload.full_text, "body");
    }

    #[test]
    fn test_platform_parse_known_and_unknown() {
        assert_eq!(Platform::parse("blog"), Platform::Blog);
        assert_eq!(Platform::parse("LinkedIn"), Platform::Linkedin);
        assert_eq!(Platform::parse(" twitter "), Platform::Twitter);
        assert_eq!(
            Platform::parse("mastodon"),
            Platform::Other("mastodon".to_string())
        );
        assert!(Platform::Twitter.is_thread());
        assert!(!Platform::Blog.is_thread());
    }

    #[test]
    fn test_draft_untagged_serialization() {
        let single = serde_json::to_value(Draft::Single("hello".into())).unwrap();
        assert_eq!(single, json!("hello"));

        let thread = serde_json::to_value(Draft::Thread(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(thread, json!(["a", "b"]));

        let back: Draft = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(back, Draft::Thread(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_draft_set_preserves_requested_order() {
        let mut drafts = DraftSet::new();
        drafts.push("twitter", Draft::Thread(vec!["t".into()]));
        drafts.push("blog", Draft::Single("b".into()));

        let order: Vec<&str> = drafts.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, vec!["twitter", "blog"]);
        assert_eq!(drafts.get("blog"), Some(&Draft::Single("b".into())));
        assert_eq!(drafts.get("medium"), None);
    }

    #[test]
    fn test_platform_content_from_drafts() {
        let mut drafts = DraftSet::new();
        drafts.push("blog", Draft::Single("post".into()));
        drafts.push("twitter", Draft::Thread(vec!["one".into(), "two".into()]));
        drafts.push("mastodon", Draft::Single("elsewhere".into()));

        let content = PlatformContent::from_drafts(&drafts);
        assert_eq!(content.blog.as_deref(), Some("post"));
        assert_eq!(content.twitter.len(), 2);
        assert!(content.linkedin.is_none());
        assert!(content.newsletter.is_none());
    }

    #[test]
    fn test_content_request_defaults() {
        let request: ContentRequest = serde_json::from_value(json!({
            "targetPlatforms": ["blog"]
        }))
        .unwrap();
        assert_eq!(request.urgency, Urgency::Normal);
        assert!(request.topic.is_none());
        assert_eq!(request.audience.language, "en");
    }
}
