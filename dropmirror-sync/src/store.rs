//! Token cache stores.
//!
//! The credential provider owns a single cached token under a fixed key;
//! a store gives it get/put semantics with a time-to-live. The memory
//! store serves `run` mode and tests, the file store lets cron-style
//! one-shot invocations share a still-valid token across processes.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dropmirror_api::AccessToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::{SyncError, SyncResult};

/// Key-value store for cached access tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the cached token for `key`, or `None` if absent or past
    /// its TTL.
    async fn get(&self, key: &str) -> SyncResult<Option<AccessToken>>;

    /// Stores a token under `key`, dropping it from the cache after `ttl`.
    async fn put(&self, key: &str, token: AccessToken, ttl: Duration) -> SyncResult<()>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
    token: AccessToken,
    cache_expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        Utc::now() < self.cache_expires_at
    }
}

/// In-process token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> SyncResult<Option<AccessToken>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live())
            .map(|e| e.token.clone()))
    }

    async fn put(&self, key: &str, token: AccessToken, ttl: Duration) -> SyncResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                token,
                cache_expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }
}

/// Token store backed by a single JSON document on disk.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> SyncResult<HashMap<String, CacheEntry>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            SyncError::Store(format!("failed to read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&json)
            .map_err(|e| SyncError::Store(format!("corrupt token cache: {e}")))
    }

    fn save(&self, entries: &HashMap<String, CacheEntry>) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| SyncError::Store(format!("failed to serialize token cache: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            SyncError::Store(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> SyncResult<Option<AccessToken>> {
        let entries = self.load()?;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live())
            .map(|e| e.token.clone()))
    }

    async fn put(&self, key: &str, token: AccessToken, ttl: Duration) -> SyncResult<()> {
        let mut entries = self.load().unwrap_or_default();
        entries.insert(
            key.to_string(),
            CacheEntry {
                token,
                cache_expires_at: Utc::now() + ttl,
            },
        );
        self.save(&entries)
    }
}
