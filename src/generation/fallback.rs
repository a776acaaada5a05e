//! Deterministic fallback synthesis.
//!
//! When the completion service yields nothing, each platform renders a
//! platform-native structure straight from the insight strings. No external
//! call, no randomness, no timestamps: identical inputs produce byte-identical
//! output. With no insights at all, every builder degrades to a single
//! placeholder sentence naming the topic.

use crate::contract::types::{Audience, Draft};
use crate::text::clamp_chars;

/// Maximum characters of one insight quoted inside a thread tweet.
const TWEET_INSIGHT_CHARS: usize = 200;
/// Hard per-tweet bound; the chunking step downstream uses the same width.
const TWEET_CHARS: usize = 240;

/// Inputs every fallback builder works from.
pub struct FallbackContext<'a> {
    pub topic: &'a str,
    pub audience: &'a Audience,
    pub insights: &'a [String],
}

fn missing_insights_line(topic: &str) -> String {
    format!(
        "Insights for {} are not yet available; research is still in progress.",
        topic
    )
}

/// Blog: heading, introduction, one subsection per insight (up to six),
/// fixed implications block, fixed next-steps list, closing line naming the
/// audience language.
pub(crate) fn blog(ctx: &FallbackContext<'_>) -> Draft {
    if ctx.insights.is_empty() {
        return Draft::Single(missing_insights_line(ctx.topic));
    }

    let mut sections = Vec::new();
    sections.push(format!("# {}: Key Insights and Analysis", ctx.topic));
    sections.push(format!(
        "## Introduction\nAn overview of {} for {}. The sections below are drawn directly from the collected research.",
        ctx.topic, ctx.audience.persona
    ));
    for (index, insight) in ctx.insights.iter().take(6).enumerate() {
        sections.push(format!("## Finding {}\n{}", index + 1, insight));
    }
    sections.push(
        "## Strategic Implications\nTaken together, these findings change how teams should plan, budget, and communicate. Weigh each one against your current roadmap before committing to changes."
            .to_string(),
    );
    sections.push(
        "## Next Steps\n1. Validate the findings above against your own data.\n2. Pick the single highest-impact change and pilot it.\n3. Share the results with your team and iterate."
            .to_string(),
    );
    sections.push(format!(
        "Reading level: {}. Language: {}.",
        ctx.audience.reading_level, ctx.audience.language
    ));

    Draft::Single(sections.join("\n\n"))
}

/// LinkedIn: emoji headline, up to five bullets, fixed takeaway, three-item
/// focus list, closing question, hashtag line with topic spaces stripped.
pub(crate) fn linkedin(ctx: &FallbackContext<'_>) -> Draft {
    if ctx.insights.is_empty() {
        return Draft::Single(missing_insights_line(ctx.topic));
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "🚀 {}: what the latest research actually says",
        ctx.topic
    ));
    lines.push(String::new());
    for insight in ctx.insights.iter().take(5) {
        lines.push(format!("• {}", insight));
    }
    lines.push(String::new());
    lines.push(
        "The takeaway: most teams underestimate how quickly these shifts compound.".to_string(),
    );
    lines.push(String::new());
    lines.push("Where to focus first:".to_string());
    lines.push("1. Audit where you stand today.".to_string());
    lines.push("2. Close the most obvious gap.".to_string());
    lines.push("3. Measure, then repeat.".to_string());
    lines.push(String::new());
    lines.push(format!("How is your team approaching {}?", ctx.topic));

    let tag: String = ctx.topic.split_whitespace().collect();
    lines.push(format!("#{} #ContentStrategy #Insights", tag));

    Draft::Single(lines.join("\n"))
}

/// Newsletter: subject line, "What I Found" bullets (up to four), fixed
/// "Why This Matters" paragraph, "Quick Win" paragraph, forward-looking
/// closing, postscript.
pub(crate) fn newsletter(ctx: &FallbackContext<'_>) -> Draft {
    if ctx.insights.is_empty() {
        return Draft::Single(missing_insights_line(ctx.topic));
    }

    let mut lines = Vec::new();
    lines.push(format!("Subject: What's new in {}", ctx.topic));
    lines.push(String::new());
    lines.push("Hi there,".to_string());
    lines.push(String::new());
    lines.push("What I Found".to_string());
    for insight in ctx.insights.iter().take(4) {
        lines.push(format!("- {}", insight));
    }
    lines.push(String::new());
    lines.push("Why This Matters".to_string());
    lines.push(
        "Signals like these rarely stay niche for long. The earlier you adjust, the cheaper the adjustment is."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Quick Win".to_string());
    lines.push(format!(
        "Pick one finding above and spend thirty minutes this week applying it to {}.",
        ctx.topic
    ));
    lines.push(String::new());
    lines.push(format!(
        "I'll keep tracking {} and report back as the picture sharpens.",
        ctx.topic
    ));
    lines.push(String::new());
    lines.push("P.S. Reply to this email if you want the full research notes.".to_string());

    Draft::Single(lines.join("\n"))
}

/// Microblog: thread marker, context tweet, one tweet per insight (up to
/// four, truncated to 200 characters, numbered i/5), closing takeaway,
/// engagement prompt. Produces the sequence directly; the chunking step does
/// not apply to it.
pub(crate) fn twitter(ctx: &FallbackContext<'_>) -> Draft {
    if ctx.insights.is_empty() {
        // A single sentence; the shape step chunks it into a one-tweet thread.
        return Draft::Single(missing_insights_line(ctx.topic));
    }

    let mut tweets = Vec::new();
    tweets.push(format!("🧵 {}: a quick thread", ctx.topic));
    tweets.push(format!(
        "We went through the latest material on {} so you don't have to. Highlights below.",
        ctx.topic
    ));
    for (index, insight) in ctx.insights.iter().take(4).enumerate() {
        let body = if insight.chars().count() > TWEET_INSIGHT_CHARS {
            format!("{}…", clamp_chars(insight, TWEET_INSIGHT_CHARS))
        } else {
            insight.clone()
        };
        tweets.push(format!("{}/5 {}", index + 1, body));
    }
    tweets.push(format!(
        "Takeaway: {} is moving faster than most playbooks assume.",
        ctx.topic
    ));
    tweets.push(
        "Found this useful? Repost the first tweet and follow for the next thread.".to_string(),
    );

    Draft::Thread(
        tweets
            .into_iter()
            .map(|tweet| clamp_chars(&tweet, TWEET_CHARS))
            .collect(),
    )
}

/// Any other platform: the topic followed by up to four insights joined with
/// spaces.
pub(crate) fn generic(ctx: &FallbackContext<'_>) -> Draft {
    if ctx.insights.is_empty() {
        return Draft::Single(format!("{}: no insights available.", ctx.topic));
    }

    let joined = ctx
        .insights
        .iter()
        .take(4)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    Draft::Single(format!("{} {}", ctx.topic, joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(topic: &'a str, audience: &'a Audience, insights: &'a [String]) -> FallbackContext<'a> {
        FallbackContext {
            topic,
            audience,
            insights,
        }
    }

    fn insights(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Insight number {}", i)).collect()
    }

    #[test]
    fn test_blog_structure() {
        let audience = Audience::default();
        let items = insights(8);
        let draft = blog(&context("Quantum Batteries", &audience, &items));
        let text = draft.as_single().expect("blog drafts are single strings");

        assert!(text.starts_with("# Quantum Batteries"));
        assert!(text.contains("## Introduction"));
        assert!(text.contains("## Finding 6"));
        // Subsections cap at six even with eight insights.
        assert!(!text.contains("## Finding 7"));
        assert!(text.contains("## Strategic Implications"));
        assert!(text.contains("## Next Steps"));
        assert!(text.contains("Language: en."));
    }

    #[test]
    fn test_linkedin_structure_and_hashtags() {
        let audience = Audience::default();
        let items = insights(7);
        let draft = linkedin(&context("Quantum Batteries", &audience, &items));
        let text = draft.as_single().unwrap();

        assert!(text.starts_with("🚀 Quantum Batteries"));
        assert_eq!(text.matches("• ").count(), 5);
        assert!(text.contains("The takeaway:"));
        assert!(text.contains("1. Audit where you stand today."));
        assert!(text.contains("How is your team approaching Quantum Batteries?"));
        assert!(text.contains("#QuantumBatteries"));
    }

    #[test]
    fn test_newsletter_structure() {
        let audience = Audience::default();
        let items = insights(6);
        let draft = newsletter(&context("rust pipelines", &audience, &items));
        let text = draft.as_single().unwrap();

        assert!(text.starts_with("Subject: What's new in rust pipelines"));
        assert!(text.contains("What I Found"));
        assert_eq!(text.matches("\n- ").count(), 4);
        assert!(text.contains("Why This Matters"));
        assert!(text.contains("Quick Win"));
        assert!(text.contains("P.S."));
    }

    #[test]
    fn test_twitter_thread_shape() {
        let audience = Audience::default();
        let items = insights(6);
        let draft = twitter(&context("Edge AI", &audience, &items));
        let tweets = draft.as_thread().expect("twitter fallback is a thread");

        // Marker + context + 4 insight tweets + takeaway + prompt.
        assert_eq!(tweets.len(), 8);
        assert!(tweets[0].starts_with("🧵 Edge AI"));
        assert!(tweets[2].starts_with("1/5 "));
        assert!(tweets[5].starts_with("4/5 "));
        assert!(tweets.iter().all(|t| t.chars().count() <= 240));
    }

    #[test]
    fn test_twitter_truncates_long_insights() {
        let audience = Audience::default();
        let items = vec!["x".repeat(300)];
        let draft = twitter(&context("T", &audience, &items));
        let tweets = draft.as_thread().unwrap();

        let insight_tweet = &tweets[2];
        assert!(insight_tweet.starts_with("1/5 "));
        assert!(insight_tweet.ends_with('…'));
        // "1/5 " prefix + 200 chars + ellipsis.
        assert_eq!(insight_tweet.chars().count(), 4 + 200 + 1);
    }

    #[test]
    fn test_generic_joins_topic_and_insights() {
        let audience = Audience::default();
        let items = insights(6);
        let draft = generic(&context("Topic", &audience, &items));
        assert_eq!(
            draft.as_single().unwrap(),
            "Topic Insight number 1 Insight number 2 Insight number 3 Insight number 4"
        );
    }

    #[test]
    fn test_empty_insights_yield_topic_placeholders() {
        let audience = Audience::default();
        let empty: Vec<String> = Vec::new();
        for builder in [blog, linkedin, newsletter, twitter, generic] {
            let draft = builder(&context("Quantum Batteries", &audience, &empty));
            let text = draft
                .as_single()
                .expect("empty-insight fallback is a single placeholder");
            assert!(!text.is_empty());
            assert!(text.contains("Quantum Batteries"));
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let audience = Audience::default();
        let items = insights(5);
        for builder in [blog, linkedin, newsletter, twitter, generic] {
            let first = builder(&context("Repeat", &audience, &items));
            let second = builder(&context("Repeat", &audience, &items));
            assert_eq!(first, second);
        }
    }
}
