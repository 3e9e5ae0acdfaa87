//! Wire types for the Dropbox API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived bearer token plus its absolute expiry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Returns true if the token will expire within the given seconds.
    pub fn expires_within_secs(&self, secs: i64) -> bool {
        Utc::now() + chrono::Duration::seconds(secs) >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Response of the `oauth2/token` refresh grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Response of the `oauth2/token` authorization-code grant.
///
/// With `token_access_type=offline` the grant carries the long-lived
/// refresh token the scheduled job runs on.
#[derive(Debug, Deserialize)]
pub struct OauthTokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Entry kind reported by the metadata and listing endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
    Deleted,
}

/// Metadata for a single file or folder entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryMetadata {
    #[serde(rename = ".tag")]
    pub kind: EntryKind,
    pub name: String,
    #[serde(default)]
    pub path_display: Option<String>,
    /// Client-set modification time; folders carry none.
    #[serde(default)]
    pub client_modified: Option<DateTime<Utc>>,
}

impl EntryMetadata {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// One page of a folder listing.
#[derive(Clone, Debug, Deserialize)]
pub struct ListFolderPage {
    pub entries: Vec<EntryMetadata>,
    pub cursor: String,
    pub has_more: bool,
}
