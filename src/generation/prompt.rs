//! Prompt composition.
//!
//! Pure function from (platform, topic, audience, insights, excerpt) to the
//! instruction block sent to the completion service. Each platform
//! contributes its own guidance; the suffix injecting topic, insights,
//! research excerpt, and audience is shared by every platform.

use crate::contract::types::{Audience, Platform};
use crate::generation::profile::PlatformProfile;
use crate::text::clamp_chars;

const MAX_PROMPT_INSIGHTS: usize = 8;
const MAX_PROMPT_EXCERPT_CHARS: usize = 3000;

/// Builds the platform-specific instruction block.
pub fn compose_prompt(
    platform: &Platform,
    topic: &str,
    audience: &Audience,
    insights: &[String],
    excerpt: &str,
) -> String {
    let profile = PlatformProfile::for_platform(platform);

    let mut prompt = String::new();
    prompt.push_str("You are a senior content strategist.\n\n");
    prompt.push_str(&format!("Platform: {}\n", platform));
    prompt.push_str(&format!("Guidance: {}\n\n", profile.guidance));
    prompt.push_str(&format!("Topic: {}\n", topic));

    prompt.push_str("Key insights:\n");
    for insight in insights.iter().take(MAX_PROMPT_INSIGHTS) {
        prompt.push_str(&format!("- {}\n", insight));
    }

    prompt.push_str("\nResearch excerpts (use to ground facts):\n");
    prompt.push_str(&clamp_chars(excerpt, MAX_PROMPT_EXCERPT_CHARS));
    prompt.push('\n');

    prompt.push_str(&format!(
        "\nAudience persona: {}\nLanguage: {}\nReading level: {}\n",
        audience.persona, audience.language, audience.reading_level
    ));

    prompt
}
