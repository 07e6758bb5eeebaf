//! Callback-style client facade
//!
//! [`ApiService`] wraps the session manager and request pipeline for callers
//! that want a value-or-nothing return plus an error callback. Each fallible
//! operation takes one `FnOnce(ErrorRecord)`; it is invoked at most once and
//! not at all on success.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use postbox_domain::{
    Config, ErrorRecord, HttpMethod, RequestDescriptor, Result, Session, UserRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::credentials::CredentialStore;
use crate::http::HttpTransport;
use crate::pipeline::RequestPipeline;
use crate::session::{LoginOutcome, SessionManager};

/// Deliver `result` as a value or through `on_error`.
pub fn report<T>(result: Result<T>, on_error: impl FnOnce(ErrorRecord)) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(kind = err.label(), "reporting error through callback");
            on_error(err.to_record());
            None
        }
    }
}

/// Client facade over one session
pub struct ApiService {
    sessions: Arc<SessionManager>,
    pipeline: RequestPipeline,
}

impl ApiService {
    /// Wire a session manager and pipeline over `transport` and `credentials`.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
        config: &Config,
    ) -> Self {
        let sessions = Arc::new(
            SessionManager::new(transport.clone(), credentials)
                .with_profile_policy(config.session.profile_failure),
        );
        let pipeline = RequestPipeline::new(transport, sessions.clone())
            .with_max_auth_attempts(config.api.auth_attempt_bound());
        Self { sessions, pipeline }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub async fn authorized_user(&self) -> Option<Session> {
        self.sessions.session().await
    }

    pub async fn auth_user_id(&self) -> Option<String> {
        self.sessions.user_id().await
    }

    pub async fn auth_expires(&self) -> Option<DateTime<Utc>> {
        self.sessions.expires().await
    }

    pub async fn user_info(&self) -> Option<UserRecord> {
        self.sessions.profile().await
    }

    /// Log in. A failed profile fetch that did not cost the session is still
    /// reported through `on_error`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<Session> {
        match self.sessions.login(email, password).await {
            Ok(LoginOutcome { session, profile_error }) => {
                if let Some(err) = profile_error {
                    on_error(err.to_record());
                }
                Some(session)
            }
            Err(err) => {
                on_error(err.to_record());
                None
            }
        }
    }

    pub async fn forgot_password(
        &self,
        email: &str,
        password: &str,
        on_complete: impl FnOnce(String),
        on_error: impl FnOnce(ErrorRecord),
    ) {
        let result = self.sessions.forgot_password(email, password).await;
        complete(result, on_complete, on_error);
    }

    /// Register. `on_complete` receives the service's response body.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        on_complete: impl FnOnce(String),
        on_error: impl FnOnce(ErrorRecord),
    ) {
        let result = self.sessions.register(email, password).await;
        complete(result, on_complete, on_error);
    }

    pub async fn logout(&self, on_error: impl FnOnce(ErrorRecord)) -> bool {
        report(self.sessions.logout().await, on_error).is_some()
    }

    pub async fn renew(&self, on_error: impl FnOnce(ErrorRecord)) -> Option<Session> {
        report(self.sessions.renew().await, on_error)
    }

    /// Re-establish a session from the saved credential if none is held.
    pub async fn restore(&self, on_error: impl FnOnce(ErrorRecord)) -> Option<Session> {
        report(self.sessions.restore().await, on_error).flatten()
    }

    /// Send and return the raw body; empty for 204/202.
    pub async fn send_raw(
        &self,
        descriptor: &RequestDescriptor,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<String> {
        report(self.pipeline.send(descriptor).await, on_error)
    }

    pub async fn send<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<T> {
        report(self.pipeline.send_typed(descriptor).await, on_error)
    }

    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        report(self.pipeline.send_json(method, endpoint, body, requires_auth).await, on_error)
    }
}

fn complete(result: Result<String>, on_complete: impl FnOnce(String), on_error: impl FnOnce(ErrorRecord)) {
    match result {
        Ok(message) => on_complete(message),
        Err(err) => {
            let record = err.to_record();
            on_complete(format!("Failed: {}", record.detail));
            on_error(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use postbox_domain::constants::endpoints;

    use super::*;
    use crate::credentials::InMemoryCredentialStore;
    use crate::testing::{auth_body, profile_body, ScriptedTransport};

    fn service(transport: &Arc<ScriptedTransport>) -> ApiService {
        ApiService::new(transport.clone(), Arc::new(InMemoryCredentialStore::new()), &Config::default())
    }

    #[tokio::test]
    async fn login_reports_profile_failure_once_and_keeps_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Post, endpoints::AUTH, 200, auth_body("u-1", "jwt-1", "rt-1"));
        transport.respond(HttpMethod::Get, endpoints::CURRENT_USER, 503, "maintenance");
        let api = service(&transport);
        let errors = RefCell::new(Vec::new());

        let session = api.login("a@b.test", "pw", |e| errors.borrow_mut().push(e)).await;

        assert!(session.is_some());
        assert_eq!(api.auth_user_id().await.as_deref(), Some("u-1"));
        assert!(api.user_info().await.is_none());
        assert_eq!(errors.into_inner(), vec![ErrorRecord::new("HTTP 503", "maintenance")]);
    }

    #[tokio::test]
    async fn successful_call_never_invokes_callback() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Post, endpoints::AUTH, 200, auth_body("u-1", "jwt-1", "rt-1"));
        transport.respond(HttpMethod::Get, endpoints::CURRENT_USER, 200, profile_body("u-1", "a@b.test"));
        transport.respond(HttpMethod::Get, "api/ping", 200, "pong");
        let api = service(&transport);
        let mut called = false;

        api.login("a@b.test", "pw", |_| called = true).await.unwrap();
        let body = api.send_raw(&RequestDescriptor::get("api/ping"), |_| called = true).await;

        assert_eq!(body.as_deref(), Some("pong"));
        assert!(!called);
        assert!(api.auth_expires().await.is_some());
    }

    #[tokio::test]
    async fn missing_session_reports_unauthorized() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = service(&transport);
        let mut reported = None;

        let value: Option<serde_json::Value> =
            api.send(&RequestDescriptor::get("api/things"), |e| reported = Some(e)).await;

        assert!(value.is_none());
        assert_eq!(
            reported,
            Some(ErrorRecord::new("Unauthorized Access", "missing or expired token"))
        );
    }

    #[tokio::test]
    async fn forgot_password_failure_completes_with_reason() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Post,
            endpoints::FORGOT_PASSWORD,
            404,
            r#"{"type":"Not Found","error":"no such user"}"#,
        );
        let api = service(&transport);
        let mut completion = String::new();
        let mut reported = None;

        api.forgot_password("x@b.test", "", |m| completion = m, |e| reported = Some(e)).await;

        assert_eq!(completion, "Failed: no such user");
        assert_eq!(reported.map(|e| e.kind), Some("Not Found".to_string()));
    }

    #[tokio::test]
    async fn register_completes_with_response_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Post, endpoints::REGISTER, 200, "check your email");
        let api = service(&transport);
        let mut completion = String::new();

        api.register("new@b.test", "pw", |m| completion = m, |_| panic!("unexpected error")).await;

        assert_eq!(completion, "check your email");
    }

    #[tokio::test]
    async fn renew_without_credential_reports_no_credential() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = service(&transport);
        let mut reported = None;

        assert!(api.restore(|e| reported = Some(e)).await.is_none());
        assert_eq!(
            reported,
            Some(ErrorRecord::new("No Credential", "Cannot renew a token without logging in first."))
        );
        assert!(api.logout(|_| panic!("logout must not fail")).await);
    }
}
