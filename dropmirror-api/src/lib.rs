//! Typed client for the Dropbox HTTP API.
//!
//! Thin plumbing over the endpoints the mirror job needs:
//! - OAuth token refresh and authorization-code exchange
//! - Metadata lookup and folder listing (with pagination)
//! - Streamed download/upload of file content
//! - Deletion of files and folders

pub mod client;
pub mod encode;
pub mod error;
pub mod types;

pub use client::{ApiConfig, DropboxClient};
pub use error::{ApiError, ApiResult};
pub use types::*;
