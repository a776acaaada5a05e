//! Platform configuration records.
//!
//! All platform-specific behavior lives in one record per platform: the
//! prompt guidance block, the sampling profile sent to the completion
//! service, and the fallback builder. Adding a platform means adding one
//! record and one match arm; unknown platforms route to the explicit default
//! record.

use crate::contract::types::{Draft, Platform};
use crate::generation::fallback::{self, FallbackContext};
use crate::llm::GenerationParams;

/// Everything platform-specific the generation stage needs.
pub struct PlatformProfile {
    /// Structural and tonal guidance injected into the prompt.
    pub guidance: &'static str,
    /// Sampling profile for the completion request.
    pub params: GenerationParams,
    /// Deterministic builder used when the service yields nothing.
    pub fallback: fn(&FallbackContext<'_>) -> Draft,
}

static BLOG: PlatformProfile = PlatformProfile {
    guidance: "Write a 900-1200 word blog post with: Title, Introduction, 4-6 H2 sections \
               with actionable details, Examples, and a Conclusion with 3 takeaways. Cite \
               facts from the research when possible.",
    params: GenerationParams {
        temperature: 0.7,
        max_tokens: 1400,
        top_p: None,
    },
    fallback: fallback::blog,
};

static LINKEDIN: PlatformProfile = PlatformProfile {
    guidance: "Write a LinkedIn post (900-1300 characters) with a strong hook, 3-5 bullet \
               insights, and a CTA.",
    params: GenerationParams {
        temperature: 0.8,
        max_tokens: 500,
        top_p: None,
    },
    fallback: fallback::linkedin,
};

static NEWSLETTER: PlatformProfile = PlatformProfile {
    guidance: "Write a newsletter section (350-600 words) with a summary paragraph, 3 \
               bullets, and next steps.",
    params: GenerationParams {
        temperature: 0.6,
        max_tokens: 700,
        top_p: None,
    },
    fallback: fallback::newsletter,
};

static TWITTER: PlatformProfile = PlatformProfile {
    guidance: "Write a concise tweet thread of 6-8 tweets. Each tweet should be 200-260 \
               characters and standalone.",
    params: GenerationParams {
        temperature: 0.9,
        max_tokens: 600,
        top_p: Some(0.95),
    },
    fallback: fallback::twitter,
};

static DEFAULT: PlatformProfile = PlatformProfile {
    guidance: "Write informative content.",
    params: GenerationParams {
        temperature: 0.7,
        max_tokens: 800,
        top_p: None,
    },
    fallback: fallback::generic,
};

impl PlatformProfile {
    pub fn for_platform(platform: &Platform) -> &'static PlatformProfile {
        match platform {
            Platform::Blog => &BLOG,
            Platform::Linkedin => &LINKEDIN,
            Platform::Newsletter => &NEWSLETTER,
            Platform::Twitter => &TWITTER,
            Platform::Other(_) => &DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms_have_distinct_profiles() {
        let blog = PlatformProfile::for_platform(&Platform::Blog);
        let twitter = PlatformProfile::for_platform(&Platform::Twitter);
        assert_ne!(blog.guidance, twitter.guidance);
        assert_ne!(blog.params, twitter.params);
    }

    #[test]
    fn test_unknown_platform_routes_to_default_record() {
        let profile = PlatformProfile::for_platform(&Platform::Other("mastodon".to_string()));
        assert_eq!(profile.guidance, "Write informative content.");
        assert_eq!(profile.params, GenerationParams::default());
    }
}
