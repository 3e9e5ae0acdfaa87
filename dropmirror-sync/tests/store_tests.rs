//! Token store TTL and persistence behavior.

use chrono::{Duration, Utc};
use dropmirror_api::AccessToken;
use dropmirror_sync::store::{FileTokenStore, MemoryTokenStore, TokenStore};

fn make_token(secret: &str, expires_in_secs: i64) -> AccessToken {
    AccessToken {
        secret: secret.to_string(),
        expires_at: Utc::now() + Duration::seconds(expires_in_secs),
    }
}

// ── MemoryTokenStore ──

#[tokio::test]
async fn memory_store_round_trip() {
    let store = MemoryTokenStore::new();
    store
        .put("k", make_token("at", 3600), Duration::seconds(3600))
        .await
        .unwrap();
    let token = store.get("k").await.unwrap().unwrap();
    assert_eq!(token.secret, "at");
}

#[tokio::test]
async fn memory_store_missing_key_is_none() {
    let store = MemoryTokenStore::new();
    assert!(store.get("absent").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_store_expired_entry_is_absent() {
    let store = MemoryTokenStore::new();
    store
        .put("k", make_token("at", 3600), Duration::seconds(-1))
        .await
        .unwrap();
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_store_overwrites_previous_entry() {
    let store = MemoryTokenStore::new();
    store
        .put("k", make_token("old", 3600), Duration::seconds(3600))
        .await
        .unwrap();
    store
        .put("k", make_token("new", 3600), Duration::seconds(3600))
        .await
        .unwrap();
    assert_eq!(store.get("k").await.unwrap().unwrap().secret, "new");
}

// ── FileTokenStore ──

#[tokio::test]
async fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");

    let store = FileTokenStore::new(&path);
    store
        .put("k", make_token("at", 3600), Duration::seconds(3600))
        .await
        .unwrap();

    let reopened = FileTokenStore::new(&path);
    let token = reopened.get("k").await.unwrap().unwrap();
    assert_eq!(token.secret, "at");
}

#[tokio::test]
async fn file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("never-written.json"));
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn file_store_expired_entry_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");

    let store = FileTokenStore::new(&path);
    store
        .put("k", make_token("at", 3600), Duration::seconds(0))
        .await
        .unwrap();
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn file_store_corrupt_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    std::fs::write(&path, "not json").unwrap();

    let store = FileTokenStore::new(&path);
    assert!(store.get("k").await.is_err());
}
