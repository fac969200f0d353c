//! Fetch failures. Callers route all of them the same way; the tags exist
//! for logs.

use reqwest::StatusCode;

/// Outcome of resolving one chunk: the payload, or why it is missing.
pub type ChunkResult = Result<serde_json::Value, FetchError>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connect, DNS, abort, timeout, or body read failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The store answered outside 2xx.
    #[error("store answered {0}")]
    Status(StatusCode),
    /// 2xx with a body that is not JSON.
    #[error("malformed chunk body: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The resolver task ended without producing a result.
    #[error("resolver task aborted")]
    Aborted,
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status(StatusCode::NOT_FOUND))
    }

    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Malformed(_) => "malformed",
            FetchError::Aborted => "aborted",
        }
    }
}
