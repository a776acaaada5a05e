use thiserror::Error;

/// Failure modes of a single completion attempt.
///
/// These never cross the [`CompletionBackend`](crate::llm::CompletionBackend)
/// boundary: the client logs them and reports
/// [`Completion::Unavailable`](crate::llm::Completion) instead.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[cfg(feature = "llm")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("no credential configured")]
    Disabled,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
