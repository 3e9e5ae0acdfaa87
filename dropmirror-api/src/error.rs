//! Dropbox API error types.

use thiserror::Error;

/// Result type for Dropbox API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the Dropbox HTTP client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token grant failed: HTTP {status}: {body}")]
    TokenGrant {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{endpoint} failed: HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
