#![allow(dead_code)]

use std::sync::Arc;

use postbox_core::CredentialStore;
use postbox_domain::{Config, ErrorRecord};
use postbox_infra::{HttpClient, InMemoryCredentialStore, PostboxContext};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EMAIL: &str = "student@example.test";
pub const PASSWORD: &str = "hunter2";

/// Mock service plus a context wired against it.
pub struct TestClient {
    pub server: MockServer,
    pub context: PostboxContext,
}

impl TestClient {
    pub async fn with_memory_store(store: Arc<InMemoryCredentialStore>) -> Self {
        let credentials: Arc<dyn CredentialStore> = store;
        Self::with_store(credentials).await
    }

    pub async fn with_store(credentials: Arc<dyn CredentialStore>) -> Self {
        let server = MockServer::start().await;
        let mut config = Config::default();
        config.api.base_url = server.uri();

        let transport = Arc::new(HttpClient::from_config(&config.api).expect("transport should build"));
        let context = PostboxContext::from_parts(config, transport, credentials);
        Self { server, context }
    }

    /// Log in with the default account, panicking on failure.
    pub async fn login(&self) {
        let mut errors = Vec::new();
        let session = self.context.api.login(EMAIL, PASSWORD, |e| errors.push(e)).await;
        assert!(session.is_some(), "login should succeed, errors: {errors:?}");
        assert!(errors.is_empty(), "login reported errors: {errors:?}");
    }
}

pub fn auth_json(user_id: &str, jwt: &str, refresh_token: &str) -> Value {
    json!({
        "userId": user_id,
        "jwt": jwt,
        "refreshToken": refresh_token,
        "expires": "2030-01-01T00:00:00Z"
    })
}

pub fn profile_json() -> Value {
    json!({
        "id": "user-1",
        "email": EMAIL,
        "firstName": "Test",
        "lastName": "Student"
    })
}

pub fn message_json(id: &str) -> Value {
    json!({
        "id": id,
        "sender": "advisor@example.test",
        "messageContent": "aGVsbG8=",
        "contentType": "text/plain",
        "sent": "2024-03-01T08:00:00",
        "recipient": "user-1",
        "read": null,
        "hidden": false
    })
}

pub async fn mount_login(server: &MockServer, jwt: &str, refresh_token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("user-1", jwt, refresh_token)))
        .mount(server)
        .await;
}

pub async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .mount(server)
        .await;
}

/// Collects every record delivered through an error callback.
#[derive(Default)]
pub struct Errors(pub Vec<ErrorRecord>);

impl Errors {
    pub fn sink(&mut self) -> impl FnOnce(ErrorRecord) + '_ {
        |record| self.0.push(record)
    }

    pub fn single(&self) -> &ErrorRecord {
        assert_eq!(self.0.len(), 1, "expected exactly one error, got {:?}", self.0);
        &self.0[0]
    }
}
