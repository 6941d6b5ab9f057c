//! Error types for the resource consumer.
//!
//! # Design
//! Only caller mistakes and cancellation surface as `ConsumerError`. Anything
//! the remote side (or the network in between) does wrong is reported as a
//! `ProblemDetails` inside `ApiResponse::Problem`, so callers check the outcome
//! instead of matching on errors for ordinary failure handling.

/// Errors returned by `ResourceConsumer` operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    /// `create`/`update` was called without a request body.
    #[error("request body is required")]
    MissingRequestBody,

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller's cancellation token fired before the call completed.
    #[error("operation cancelled")]
    Cancelled,
}

/// Failures reported by an `ApiClient` before a response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUri(err.to_string())
        } else {
            TransportError::Connect(err.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        TransportError::InvalidUri(err.to_string())
    }
}
