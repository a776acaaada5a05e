//! Quality-assurance stage.
//!
//! Runs fact-check, plagiarism, sentiment, and brand-compliance checks over
//! every generated piece. The checks are stubs standing in for external
//! services; the pass/fail gate and the per-piece result shape are real.
//! This is the one stage with two outward topics: checks pass or they don't.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::events::{GenerationCompleted, GenerationContext, topic};
use crate::pipeline::{Event, Stage, StageContext, StageError, decode_or_default};
use crate::state::{StateStore, field};

/// Plagiarism similarity above this fails the piece.
const MAX_PLAGIARISM: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheck {
    pub passed: bool,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandCompliance {
    pub passed: bool,
    pub issues: Vec<String>,
}

/// Check results for one content piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaResult {
    pub fact_check: FactCheck,
    pub plagiarism: f64,
    pub sentiment: String,
    pub brand_compliance: BrandCompliance,
}

/// Payload of both QA outcome events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaOutcome {
    pub results: HashMap<String, QaResult>,
    pub context: GenerationContext,
}

// Placeholder checks; swap in the real services here.
async fn fact_check(_text: &str) -> FactCheck {
    FactCheck {
        passed: true,
        score: 0.92,
    }
}

async fn plagiarism_score(_text: &str) -> f64 {
    0.03
}

async fn sentiment(_text: &str) -> String {
    "positive".to_string()
}

async fn brand_compliance(_text: &str) -> BrandCompliance {
    BrandCompliance {
        passed: true,
        issues: Vec::new(),
    }
}

async fn check_piece(text: &str) -> QaResult {
    QaResult {
        fact_check: fact_check(text).await,
        plagiarism: plagiarism_score(text).await,
        sentiment: sentiment(text).await,
        brand_compliance: brand_compliance(text).await,
    }
}

fn piece_failed(result: &QaResult) -> bool {
    !result.fact_check.passed
        || result.plagiarism > MAX_PLAGIARISM
        || !result.brand_compliance.passed
}

/// The quality-assurance stage. Subscribes to the generation event.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityAssuranceStage;

#[async_trait]
impl Stage for QualityAssuranceStage {
    fn name(&self) -> &'static str {
        "quality-assurance"
    }

    fn subscribes(&self) -> &'static str {
        topic::GENERATION_COMPLETED
    }

    async fn handle(&self, ctx: &StageContext, input: Value) -> Result<Event, StageError> {
        let generated: GenerationCompleted = decode_or_default(input);
        let contents = &generated.platform_contents;

        let mut pieces: Vec<(String, &str)> = Vec::new();
        if let Some(blog) = &contents.blog {
            pieces.push(("blog".to_string(), blog.as_str()));
        }
        if let Some(linkedin) = &contents.linkedin {
            pieces.push(("linkedin".to_string(), linkedin.as_str()));
        }
        if let Some(newsletter) = &contents.newsletter {
            pieces.push(("newsletter".to_string(), newsletter.as_str()));
        }
        for (index, tweet) in contents.twitter.iter().enumerate() {
            pieces.push((format!("twitter_{}", index), tweet.as_str()));
        }

        let mut results = HashMap::new();
        for (key, text) in pieces {
            results.insert(key, check_piece(text).await);
        }

        ctx.store
            .set(
                &ctx.trace_id,
                field::QA_RESULTS,
                serde_json::to_value(&results)?,
            )
            .await?;

        let failed = results.values().any(piece_failed);
        let outcome_topic = if failed {
            topic::QA_FAILED
        } else {
            topic::QA_COMPLETED
        };
        log::info!(
            "quality-assurance checked {} pieces (trace {}): {}",
            results.len(),
            ctx.trace_id,
            if failed { "failed" } else { "passed" }
        );

        let outcome = QaOutcome {
            results,
            context: generated.context,
        };
        Ok(Event::new(outcome_topic, serde_json::to_value(&outcome)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stub_checks_pass_and_emit_completed() {
        let stage = QualityAssuranceStage;
        let ctx = StageContext::new(Arc::new(MemoryStateStore::new()));

        let event = stage
            .handle(
                &ctx,
                json!({
                    "platformContents": {
                        "blog": "a post",
                        "twitter": ["one", "two"]
                    },
                    "context": {"topic": "t", "audience": {"persona": "devs"}}
                }),
            )
            .await
            .unwrap();

        assert_eq!(event.topic, topic::QA_COMPLETED);
        let outcome: QaOutcome = serde_json::from_value(event.data).unwrap();
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.contains_key("blog"));
        assert!(outcome.results.contains_key("twitter_0"));
        assert!(outcome.results.contains_key("twitter_1"));

        let stored = ctx
            .store
            .get(&ctx.trace_id, field::QA_RESULTS)
            .await
            .unwrap()
            .expect("qa results persisted");
        assert_eq!(stored["blog"]["factCheck"]["passed"], json!(true));
    }

    #[test]
    fn test_piece_failure_predicate() {
        let passing = QaResult {
            fact_check: FactCheck {
                passed: true,
                score: 0.92,
            },
            plagiarism: 0.03,
            sentiment: "positive".to_string(),
            brand_compliance: BrandCompliance {
                passed: true,
                issues: Vec::new(),
            },
        };
        assert!(!piece_failed(&passing));

        let plagiarized = QaResult {
            plagiarism: 0.5,
            ..passing.clone()
        };
        assert!(piece_failed(&plagiarized));

        let off_brand = QaResult {
            brand_compliance: BrandCompliance {
                passed: false,
                issues: vec!["tone".to_string()],
            },
            ..passing
        };
        assert!(piece_failed(&off_brand));
    }
}
