//! Path metadata resolution.
//!
//! Every failure other than "not found" degrades to "absent" so a
//! transient metadata error never triggers a transfer or a deletion on
//! stale assumptions — callers tolerate false negatives and simply do
//! nothing this tick.

use chrono::{DateTime, Utc};
use dropmirror_api::DropboxClient;
use std::sync::Arc;
use tracing::warn;

pub struct MetadataResolver {
    client: Arc<DropboxClient>,
}

impl MetadataResolver {
    pub fn new(client: Arc<DropboxClient>) -> Self {
        Self { client }
    }

    /// Returns the client-set modification time of `path`, or `None` when
    /// the path is missing or its metadata cannot be resolved right now.
    pub async fn resolve(&self, token: &str, path: &str) -> Option<DateTime<Utc>> {
        match self.client.get_metadata(token, path).await {
            Ok(meta) => meta.and_then(|m| m.client_modified),
            Err(e) => {
                warn!("metadata lookup failed for {path}: {e}");
                None
            }
        }
    }

    /// True only when `path` exists and is a folder.
    pub async fn folder_exists(&self, token: &str, path: &str) -> bool {
        match self.client.get_metadata(token, path).await {
            Ok(meta) => meta.is_some_and(|m| m.is_folder()),
            Err(e) => {
                warn!("metadata lookup failed for {path}: {e}");
                false
            }
        }
    }
}
