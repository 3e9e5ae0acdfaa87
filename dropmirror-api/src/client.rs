//! HTTP client for the Dropbox API.
//!
//! RPC endpoints (metadata, listing, delete, OAuth) live on the API host;
//! download and upload go through the content host. Both hosts are
//! configurable so tests can point the client at a local mock server.
//! No request timeout is set here — the hosting environment's execution
//! ceiling bounds every call.

use crate::encode::header_safe;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_api_base_url() -> String {
    "https://api.dropboxapi.com".to_string()
}

fn default_content_base_url() -> String {
    "https://content.dropboxapi.com".to_string()
}

/// Connection settings for the Dropbox HTTP API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// RPC endpoint base (metadata, listing, delete, OAuth).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Content endpoint base (download, upload).
    #[serde(default = "default_content_base_url")]
    pub content_base_url: String,

    /// App key issued by the Dropbox app console.
    #[serde(default)]
    pub client_id: String,

    /// App secret issued by the Dropbox app console.
    #[serde(default)]
    pub client_secret: String,

    /// Long-lived refresh secret obtained via the authorize flow.
    #[serde(default)]
    pub refresh_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            content_base_url: default_content_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
        }
    }
}

/// Header argument of the download endpoint.
#[derive(Serialize)]
struct DownloadArg<'a> {
    path: &'a str,
}

/// Header argument of the upload endpoint.
#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
}

/// HTTP client for the Dropbox API.
pub struct DropboxClient {
    client: Client,
    config: ApiConfig,
}

impl DropboxClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Exchanges the configured refresh token for a fresh access token.
    pub async fn refresh_access_token(&self) -> ApiResult<AccessToken> {
        let url = format!("{}/oauth2/token", self.config.api_base_url);
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let resp = self.client.post(&url).form(&params).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::TokenGrant { status, body });
        }

        let token: TokenResponse = resp.json().await?;
        Ok(AccessToken {
            secret: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        })
    }

    /// Exchanges an authorization code for a refresh token (bootstrap flow).
    pub async fn exchange_authorization_code(&self, code: &str) -> ApiResult<OauthTokenGrant> {
        let url = format!("{}/oauth2/token", self.config.api_base_url);
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let resp = self.client.post(&url).form(&params).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::TokenGrant { status, body });
        }

        Ok(resp.json().await?)
    }

    /// Fetches metadata for an exact path. `Ok(None)` means the path does
    /// not exist — Dropbox reports missing paths as HTTP 409.
    pub async fn get_metadata(&self, token: &str, path: &str) -> ApiResult<Option<EntryMetadata>> {
        let url = format!("{}/2/files/get_metadata", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await?;

        if resp.status() == StatusCode::CONFLICT {
            return Ok(None);
        }
        let resp = check_status(resp, "get_metadata").await?;
        Ok(Some(resp.json().await?))
    }

    /// Lists the immediate entries of a folder, following pagination.
    pub async fn list_folder(&self, token: &str, path: &str) -> ApiResult<Vec<EntryMetadata>> {
        let url = format!("{}/2/files/list_folder", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await?;
        let resp = check_status(resp, "list_folder").await?;
        let mut page: ListFolderPage = resp.json().await?;

        let mut entries = std::mem::take(&mut page.entries);
        while page.has_more {
            let url = format!("{}/2/files/list_folder/continue", self.config.api_base_url);
            let resp = self
                .client
                .post(&url)
                .bearer_auth(token)
                .json(&serde_json::json!({ "cursor": page.cursor }))
                .send()
                .await?;
            let resp = check_status(resp, "list_folder/continue").await?;
            page = resp.json().await?;
            entries.extend(std::mem::take(&mut page.entries));
        }

        debug!("listed {} entries under {path}", entries.len());
        Ok(entries)
    }

    /// Starts a streamed download; the response body is the file content.
    pub async fn download(&self, token: &str, path: &str) -> ApiResult<reqwest::Response> {
        let url = format!("{}/2/files/download", self.config.content_base_url);
        let arg = header_safe(&serde_json::to_string(&DownloadArg { path })?);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Dropbox-API-Arg", arg)
            .send()
            .await?;
        check_status(resp, "download").await
    }

    /// Uploads a request body to an exact path, unconditionally replacing
    /// whatever is there (`mode=overwrite`, no autorename). The body may be
    /// a stream; it is forwarded without buffering.
    pub async fn upload(&self, token: &str, path: &str, body: reqwest::Body) -> ApiResult<()> {
        let url = format!("{}/2/files/upload", self.config.content_base_url);
        let arg = header_safe(&serde_json::to_string(&UploadArg {
            path,
            mode: "overwrite",
            autorename: false,
        })?);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Dropbox-API-Arg", arg)
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;
        check_status(resp, "upload").await?;
        Ok(())
    }

    /// Deletes a file, or a folder together with its contents.
    pub async fn delete(&self, token: &str, path: &str) -> ApiResult<()> {
        let url = format!("{}/2/files/delete_v2", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await?;
        check_status(resp, "delete_v2").await?;
        Ok(())
    }
}

async fn check_status(
    resp: reqwest::Response,
    endpoint: &'static str,
) -> ApiResult<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint,
        status,
        body,
    })
}
