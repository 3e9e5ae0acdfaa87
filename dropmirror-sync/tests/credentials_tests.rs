//! Credential provider refresh-vs-reuse behavior against a mock OAuth
//! endpoint.

use chrono::{Duration, Utc};
use dropmirror_api::{AccessToken, ApiConfig, DropboxClient};
use dropmirror_sync::credentials::CredentialProvider;
use dropmirror_sync::error::SyncError;
use dropmirror_sync::store::{MemoryTokenStore, TokenStore};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_CACHE_KEY: &str = "access-token";

fn client_for(server: &MockServer) -> Arc<DropboxClient> {
    Arc::new(DropboxClient::new(ApiConfig {
        api_base_url: server.uri(),
        content_base_url: server.uri(),
        client_id: "app-key".into(),
        client_secret: "app-secret".into(),
        refresh_token: "refresh-secret".into(),
    }))
}

async fn mount_token_endpoint(server: &MockServer, secret: &str, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": secret,
            "token_type": "bearer",
            "expires_in": 14400
        })))
        .expect(expect)
        .mount(server)
        .await;
}

#[tokio::test]
async fn empty_store_triggers_refresh() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "at-fresh", 1).await;

    let store = Arc::new(MemoryTokenStore::new());
    let provider = CredentialProvider::new(client_for(&server), store.clone(), 600);

    let token = provider.get_valid_token().await.unwrap();
    assert_eq!(token.secret, "at-fresh");

    // The refreshed token landed in the store with its remaining lifetime.
    let cached = store.get(TOKEN_CACHE_KEY).await.unwrap().unwrap();
    assert_eq!(cached.secret, "at-fresh");
}

#[tokio::test]
async fn cached_token_is_reused_verbatim() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "at-should-not-be-fetched", 0).await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                secret: "at-cached".into(),
                expires_at: Utc::now() + Duration::hours(3),
            },
            Duration::hours(3),
        )
        .await
        .unwrap();

    let provider = CredentialProvider::new(client_for(&server), store, 600);
    let token = provider.get_valid_token().await.unwrap();
    assert_eq!(token.secret, "at-cached");
}

#[tokio::test]
async fn token_within_margin_is_refreshed() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "at-fresh", 1).await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                secret: "at-stale".into(),
                expires_at: Utc::now() + Duration::seconds(60),
            },
            Duration::seconds(60),
        )
        .await
        .unwrap();

    // 60 seconds left, 600 second margin: must refresh.
    let provider = CredentialProvider::new(client_for(&server), store, 600);
    let token = provider.get_valid_token().await.unwrap();
    assert_eq!(token.secret, "at-fresh");
}

#[tokio::test]
async fn margin_is_tunable() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "at-should-not-be-fetched", 0).await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .put(
            TOKEN_CACHE_KEY,
            AccessToken {
                secret: "at-cached".into(),
                expires_at: Utc::now() + Duration::seconds(120),
            },
            Duration::seconds(120),
        )
        .await
        .unwrap();

    // 120 seconds left is plenty for a 30 second margin.
    let provider = CredentialProvider::new(client_for(&server), store, 30);
    let token = provider.get_valid_token().await.unwrap();
    assert_eq!(token.secret, "at-cached");
}

#[tokio::test]
async fn refresh_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let provider = CredentialProvider::new(client_for(&server), store, 600);

    let result = provider.get_valid_token().await;
    assert!(matches!(result.unwrap_err(), SyncError::Credential(_)));
}
