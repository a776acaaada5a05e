//! External completion service client.
//!
//! The generation stage talks to the text-generation service through the
//! [`CompletionBackend`] trait so the pipeline itself never depends on a
//! concrete provider. The reqwest-backed OpenAI-compatible client lives behind
//! the `llm` feature; [`OfflineCompletion`] is the always-available
//! "no credential supplied" collaborator.

pub mod error;
#[cfg(feature = "llm")]
pub mod openai;

pub use error::CompletionError;
#[cfg(feature = "llm")]
pub use openai::{CompletionConfig, OpenAiCompletion};

use async_trait::async_trait;

// ============================================================================
// Completion result
// ============================================================================

/// Outcome of one completion attempt.
///
/// The two cases are deliberately distinct: `Produced` means the service
/// answered (possibly with empty text), `Unavailable` means the call never
/// yielded an answer (no credential, transport failure, non-success status,
/// timeout, unparseable body). Fallback synthesis triggers on a branch over
/// this type, never on string emptiness alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Produced(String),
    Unavailable,
}

impl Completion {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Completion::Unavailable)
    }

    /// The produced text, if the service answered.
    pub fn text(&self) -> Option<&str> {
        match self {
            Completion::Produced(text) => Some(text),
            Completion::Unavailable => None,
        }
    }
}

// ============================================================================
// Generation parameters
// ============================================================================

/// Platform-tuned sampling profile carried on each completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 800,
            top_p: None,
        }
    }
}

// ============================================================================
// Backend contract
// ============================================================================

/// One request/response call to a text-generation service.
///
/// Implementations make exactly one attempt and never surface errors: any
/// failure mode becomes [`Completion::Unavailable`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Completion;
}

/// The disabled backend: every call reports the service as unavailable.
///
/// This is the completion collaborator for offline runs and for deployments
/// that never configure a credential; the pipeline degrades to fallback
/// synthesis on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCompletion;

#[async_trait]
impl CompletionBackend for OfflineCompletion {
    async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Completion {
        Completion::Unavailable
    }
}
