//! Keyed state store interface.
//!
//! Every read and write is scoped to a correlation key (trace id): one
//! workflow execution owns one key, so no locking discipline beyond the store
//! implementation's own interior mutability is required. The production store
//! is an external collaborator; [`MemoryStateStore`] is the in-process
//! reference used by tests and local runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Field names the stages persist under the correlation key.
pub mod field {
    pub const REQUEST: &str = "request";
    pub const RESEARCH: &str = "research";
    pub const GENERATED_CONTENT: &str = "generated.content";
    pub const ARTIFACT_DRAFTS: &str = "artifacts.drafts";
    pub const QA_RESULTS: &str = "qa.results";
    pub const PERFORMANCE_METRICS: &str = "performance.metrics";
    pub const PERFORMANCE_INSIGHTS: &str = "performance.insights";
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state store backend error: {0}")]
    Backend(String),
}

/// `set(key, field, value)` semantics over JSON values.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn set(&self, scope: &str, field: &str, value: Value) -> Result<(), StateError>;

    async fn get(&self, scope: &str, field: &str) -> Result<Option<Value>, StateError>;
}

/// Simple in-memory store keyed by `(scope, field)`.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<(String, String), Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set(&self, scope: &str, field: &str, value: Value) -> Result<(), StateError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StateError::Backend("state mutex poisoned".to_string()))?;
        entries.insert((scope.to_string(), field.to_string()), value);
        Ok(())
    }

    async fn get(&self, scope: &str, field: &str) -> Result<Option<Value>, StateError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StateError::Backend("state mutex poisoned".to_string()))?;
        Ok(entries
            .get(&(scope.to_string(), field.to_string()))
            .cloned())
    }
}
