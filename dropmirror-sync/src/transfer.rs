//! Streamed file transfer.
//!
//! The download response body is piped straight into the upload request,
//! so the payload never materializes in memory.

use dropmirror_api::DropboxClient;
use std::sync::Arc;
use tracing::{debug, error};

pub struct TransferEngine {
    client: Arc<DropboxClient>,
}

impl TransferEngine {
    pub fn new(client: Arc<DropboxClient>) -> Self {
        Self { client }
    }

    /// Copies `source` to `destination`, replacing whatever is there.
    /// Returns false on any failure; callers must not delete the source
    /// unless this returned true.
    pub async fn stream(&self, token: &str, source: &str, destination: &str) -> bool {
        let response = match self.client.download(token, source).await {
            Ok(r) => r,
            Err(e) => {
                error!("download failed for {source}: {e}");
                return false;
            }
        };

        let body = reqwest::Body::wrap_stream(response.bytes_stream());
        match self.client.upload(token, destination, body).await {
            Ok(()) => {
                debug!("streamed {source} -> {destination}");
                true
            }
            Err(e) => {
                error!("upload failed for {destination}: {e}");
                false
            }
        }
    }
}
