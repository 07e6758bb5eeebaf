//! Integration tests for credential persistence across the session lifecycle
//!
//! **Coverage:**
//! - Login writes the saved credential file
//! - Logout is idempotent and removes the file
//! - A corrupt file is deleted and treated as absent on cold start
//! - Cold start from a saved token pair

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use postbox_core::CredentialStore;
use postbox_domain::constants::NO_CREDENTIAL_DETAIL;
use postbox_domain::{ErrorRecord, SavedCredential};
use postbox_infra::FileCredentialStore;
use support::{auth_json, mount_login, mount_profile, Errors, TestClient, EMAIL, PASSWORD};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn file_store(dir: &TempDir) -> Arc<FileCredentialStore> {
    Arc::new(FileCredentialStore::new(dir.path().join(".login.cred")))
}

#[tokio::test]
async fn login_persists_and_logout_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let client = TestClient::with_store(store.clone()).await;
    mount_login(&client.server, "jwt-1", "rt-1").await;
    mount_profile(&client.server).await;

    client.login().await;

    let saved = store.load().await.unwrap().expect("login should save the credential");
    assert_eq!(saved.email, EMAIL);
    assert_eq!(saved.password, PASSWORD);
    assert_eq!(saved.last_access_token, "jwt-1");

    let mut first = Errors::default();
    let mut second = Errors::default();
    assert!(client.context.api.logout(first.sink()).await);
    assert!(client.context.api.logout(second.sink()).await);

    assert!(first.0.is_empty() && second.0.is_empty());
    assert!(!store.path().exists());
    assert!(client.context.api.authorized_user().await.is_none());
}

#[tokio::test]
async fn corrupt_file_is_deleted_and_reported_as_no_credential() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    std::fs::write(store.path(), "SavedEmail=student@example.test").unwrap();
    let client = TestClient::with_store(store.clone()).await;

    let mut errors = Errors::default();
    let restored = client.context.api.restore(errors.sink()).await;

    assert!(restored.is_none());
    assert_eq!(errors.single(), &ErrorRecord::new("No Credential", NO_CREDENTIAL_DETAIL));
    assert!(!store.path().exists());
    let received = client.server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn cold_start_exchanges_saved_refresh_token() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.save(&SavedCredential::new(EMAIL, PASSWORD, "jwt-saved", "rt+saved")).await.unwrap();
    let client = TestClient::with_store(store.clone()).await;
    mount_profile(&client.server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/renew"))
        .and(query_param("refreshToken", "rt+saved"))
        .and(header("authorization", "Bearer jwt-saved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("user-1", "jwt-2", "rt-2")))
        .expect(1)
        .mount(&client.server)
        .await;

    let mut errors = Errors::default();
    let restored = client.context.api.restore(errors.sink()).await;

    assert!(errors.0.is_empty(), "unexpected errors: {:?}", errors.0);
    assert_eq!(restored.map(|s| s.user_id).as_deref(), Some("user-1"));
    let saved = store.load().await.unwrap().unwrap();
    assert_eq!(saved.last_access_token, "jwt-2");
    assert_eq!(saved.password, PASSWORD);
    assert!(client.context.api.user_info().await.is_some());
}
