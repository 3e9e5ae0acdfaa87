//! Access-token lifecycle with store-backed caching.
//!
//! Every outbound call runs on a short-lived bearer token obtained from
//! the OAuth refresh grant. The token is cached under a fixed key and
//! refreshed shortly before expiry; concurrent refreshes racing to
//! overwrite the cache are tolerated (last writer wins, both tokens are
//! valid).

use chrono::Utc;
use dropmirror_api::{AccessToken, DropboxClient};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::store::TokenStore;

/// Cache key for the single credential this job tracks.
const TOKEN_CACHE_KEY: &str = "access-token";

/// Supplies a valid bearer token to every outbound call.
pub struct CredentialProvider {
    client: Arc<DropboxClient>,
    store: Arc<dyn TokenStore>,
    refresh_margin_secs: i64,
}

impl CredentialProvider {
    pub fn new(
        client: Arc<DropboxClient>,
        store: Arc<dyn TokenStore>,
        refresh_margin_secs: i64,
    ) -> Self {
        Self {
            client,
            store,
            refresh_margin_secs,
        }
    }

    /// Returns a token valid beyond the refresh margin, refreshing through
    /// the OAuth endpoint when the cached one is missing or close to
    /// expiry. Refresh failure is fatal for the caller's tick.
    pub async fn get_valid_token(&self) -> SyncResult<AccessToken> {
        match self.store.get(TOKEN_CACHE_KEY).await {
            Ok(Some(token)) if !token.expires_within_secs(self.refresh_margin_secs) => {
                return Ok(token);
            }
            Ok(Some(_)) => {
                debug!(
                    "cached token expires within {}s, refreshing",
                    self.refresh_margin_secs
                );
            }
            Ok(None) => {}
            Err(e) => warn!("token cache read failed, refreshing: {e}"),
        }

        let token = self
            .client
            .refresh_access_token()
            .await
            .map_err(SyncError::Credential)?;
        debug!("refreshed access token, expires at {}", token.expires_at);

        // Cache lifetime tracks the token's own remaining lifetime.
        let ttl = token.expires_at - Utc::now();
        if let Err(e) = self.store.put(TOKEN_CACHE_KEY, token.clone(), ttl).await {
            warn!("token cache write failed: {e}");
        }
        Ok(token)
    }
}
