//! Error types for the top.gg API client.
//!
//! # Design
//! A missing bot id is reported as `MissingId` before any request is built,
//! so callers can tell a usage mistake apart from a remote failure. Every
//! status outside 200/201/204 lands in `Http` regardless of class; the
//! remote service does not give 4xx and 5xx different meaning to a client.

use thiserror::Error;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No id argument was given and the config has no default bot id.
    #[error("{operation} requires an id argument")]
    MissingId { operation: &'static str },

    /// The server answered with a status other than 200, 201 or 204.
    /// `message` is the response body rendered as text.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body was not the JSON shape the operation expects.
    #[error("deserialization failed: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
