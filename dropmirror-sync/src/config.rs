//! Mirror job configuration.

use dropmirror_api::ApiConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SyncError, SyncResult};

/// Configuration for one mirror deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Folder the fixed files are picked up from.
    #[serde(default = "default_source_folder")]
    pub source_folder: String,

    /// Folder the fixed files are delivered to.
    #[serde(default = "default_target_folder")]
    pub target_folder: String,

    /// Fixed file names mirrored from source to target.
    #[serde(default)]
    pub files: Vec<String>,

    /// Root folder holding the dated subfolders of documents.
    #[serde(default = "default_documents_folder")]
    pub documents_folder: String,

    /// Archive root the dated subfolders are mirrored into, one year
    /// folder per subfolder prefix.
    #[serde(default = "default_archive_folder")]
    pub archive_folder: String,

    /// Case-insensitive file suffixes treated as documents.
    #[serde(default = "default_document_extensions")]
    pub document_extensions: Vec<String>,

    /// Refresh the access token this many seconds before it expires.
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: i64,

    /// Interval between ticks in `run` mode (seconds).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Optional on-disk token cache, so one-shot invocations reuse a
    /// still-valid token across process boundaries.
    #[serde(default)]
    pub token_cache_path: Option<String>,

    /// Dropbox app credentials and endpoints.
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_source_folder() -> String {
    "/Outbox".to_string()
}

fn default_target_folder() -> String {
    "/Mirror".to_string()
}

fn default_documents_folder() -> String {
    "/Documents".to_string()
}

fn default_archive_folder() -> String {
    "/Archive".to_string()
}

fn default_document_extensions() -> Vec<String> {
    vec![".pdf".to_string()]
}

fn default_refresh_margin() -> i64 {
    600 // 10 minutes before expiry
}

fn default_interval() -> u64 {
    300
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_folder: default_source_folder(),
            target_folder: default_target_folder(),
            files: Vec::new(),
            documents_folder: default_documents_folder(),
            archive_folder: default_archive_folder(),
            document_extensions: default_document_extensions(),
            refresh_margin_secs: default_refresh_margin(),
            interval_secs: default_interval(),
            token_cache_path: None,
            api: ApiConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SyncError::Config(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> SyncResult<Self> {
        toml::from_str(content).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Writes configuration back out (used by the authorize flow to
    /// persist the refresh token).
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> SyncResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SyncError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(&path, content).map_err(|e| {
            SyncError::Config(format!("failed to write {}: {e}", path.as_ref().display()))
        })
    }
}
