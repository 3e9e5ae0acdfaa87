//! Source cleanup after confirmed transfer.

use dropmirror_api::DropboxClient;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CleanupExecutor {
    client: Arc<DropboxClient>,
}

impl CleanupExecutor {
    pub fn new(client: Arc<DropboxClient>) -> Self {
        Self { client }
    }

    /// Deletes a file, or a folder with its contents. Failure is logged
    /// and reported, never raised; the source stays in place and the next
    /// tick retries.
    pub async fn delete(&self, token: &str, path: &str) -> bool {
        match self.client.delete(token, path).await {
            Ok(()) => {
                info!("deleted {path}");
                true
            }
            Err(e) => {
                warn!("delete failed for {path}: {e}");
                false
            }
        }
    }
}
