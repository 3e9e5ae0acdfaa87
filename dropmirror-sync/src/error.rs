//! Mirror job error types.

use thiserror::Error;

/// Result type for mirror operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can abort a reconciliation tick.
///
/// Transfer and cleanup failures never surface here — they are logged and
/// folded into the tick report so sibling items keep running.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Token refresh failed. Fatal for the current tick; the next
    /// scheduled tick retries from scratch.
    #[error("credential refresh failed: {0}")]
    Credential(#[source] dropmirror_api::ApiError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("token store error: {0}")]
    Store(String),
}
