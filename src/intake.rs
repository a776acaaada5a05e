//! Request intake.
//!
//! Validates an inbound content request, records it under the correlation
//! key for auditing, and mints the kickoff event the dispatcher publishes to
//! start the pipeline. Validation failure is the one caller-visible error in
//! the crate: it happens before the pipeline owns the work, so rejecting is
//! still allowed here.

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use crate::contract::events::topic;
use crate::contract::types::ContentRequest;
use crate::pipeline::{Event, StageContext};
use crate::state::{StateError, StateStore, field};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("topic must be at least 3 characters when present")]
    TopicTooShort,

    #[error("at least one target platform is required")]
    NoTargetPlatforms,

    #[error("audience persona must be at least 2 characters")]
    PersonaTooShort,

    #[error(transparent)]
    State(#[from] StateError),

    #[error("request serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct RequestIntake;

impl RequestIntake {
    pub fn validate(request: &ContentRequest) -> Result<(), RequestError> {
        if let Some(topic) = &request.topic {
            if topic.chars().count() < 3 {
                return Err(RequestError::TopicTooShort);
            }
        }
        if request.target_platforms.is_empty() {
            return Err(RequestError::NoTargetPlatforms);
        }
        if request.audience.persona.chars().count() < 2 {
            return Err(RequestError::PersonaTooShort);
        }
        Ok(())
    }

    /// Validates and records an inbound request, returning the kickoff event.
    pub async fn accept(
        ctx: &StageContext,
        request: ContentRequest,
    ) -> Result<Event, RequestError> {
        Self::validate(&request)?;

        let mut recorded = serde_json::to_value(&request)?;
        if let Some(object) = recorded.as_object_mut() {
            object.insert(
                "receivedAt".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }
        ctx.store
            .set(&ctx.trace_id, field::REQUEST, recorded)
            .await?;

        log::info!(
            "accepted content request (trace {}): topic={:?}",
            ctx.trace_id,
            request.topic
        );

        let mut data = serde_json::to_value(&request)?;
        if let Some(object) = data.as_object_mut() {
            object.insert("traceId".to_string(), Value::String(ctx.trace_id.clone()));
        }
        Ok(Event::new(topic::CONTENT_REQUEST_RECEIVED, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::types::Audience;
    use crate::state::{MemoryStateStore, StateStore};
    use std::sync::Arc;

    fn request(platforms: &[&str]) -> ContentRequest {
        ContentRequest {
            topic: Some("Quantum Batteries".to_string()),
            source_url: None,
            target_platforms: platforms.iter().map(|p| p.to_string()).collect(),
            urgency: Default::default(),
            audience: Audience::default(),
        }
    }

    #[test]
    fn test_validation_rejects_bad_requests() {
        let mut short_topic = request(&["blog"]);
        short_topic.topic = Some("ab".to_string());
        assert!(matches!(
            RequestIntake::validate(&short_topic),
            Err(RequestError::TopicTooShort)
        ));

        let no_platforms = request(&[]);
        assert!(matches!(
            RequestIntake::validate(&no_platforms),
            Err(RequestError::NoTargetPlatforms)
        ));

        let mut bad_persona = request(&["blog"]);
        bad_persona.audience.persona = "x".to_string();
        assert!(matches!(
            RequestIntake::validate(&bad_persona),
            Err(RequestError::PersonaTooShort)
        ));

        // Topic is optional altogether.
        let mut no_topic = request(&["blog"]);
        no_topic.topic = None;
        assert!(RequestIntake::validate(&no_topic).is_ok());
    }

    #[tokio::test]
    async fn test_accept_persists_and_mints_kickoff_event() {
        let ctx = StageContext::new(Arc::new(MemoryStateStore::new()));
        let event = RequestIntake::accept(&ctx, request(&["blog", "twitter"]))
            .await
            .unwrap();

        assert_eq!(event.topic, topic::CONTENT_REQUEST_RECEIVED);
        assert_eq!(event.data["traceId"], Value::String(ctx.trace_id.clone()));
        assert_eq!(event.data["targetPlatforms"][1], "twitter");

        let stored = ctx
            .store
            .get(&ctx.trace_id, field::REQUEST)
            .await
            .unwrap()
            .expect("request persisted");
        assert!(stored.get("receivedAt").is_some());
        assert_eq!(stored["topic"], "Quantum Batteries");
    }
}
