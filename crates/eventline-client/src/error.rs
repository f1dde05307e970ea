//! Error types for streaming API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for streaming API operations.
///
/// Every session-level failure the consume loop reacts to is a recognized
/// kind here; the loop retries after backoff on all of them. Creation
/// failures are surfaced to the caller and never retried.
#[derive(Debug, Error)]
pub enum StreamingError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("connection rejected with status {status}: {body}")]
    Connect { status: StatusCode, body: String },

    #[error("events response carries no stream id header")]
    MissingStreamId,

    #[error("decode error: {0}")]
    Decode(String),

    #[error("event processing failed: {0}")]
    Processing(#[source] anyhow::Error),

    #[error("cursor commit rejected with status {status}: {body}")]
    CommitRejected { status: StatusCode, body: String },

    #[error("subscription creation rejected with status {status}: {body}")]
    SubscriptionRejected { status: StatusCode, body: String },
}

/// Result type for streaming API operations.
pub type Result<T> = std::result::Result<T, StreamingError>;
