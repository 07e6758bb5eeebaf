//! Authenticated request pipeline

use std::sync::Arc;

use postbox_domain::constants::DEFAULT_MAX_AUTH_ATTEMPTS;
use postbox_domain::{HttpMethod, PostboxError, RequestDescriptor, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::decoder::ResponseDecoder;
use super::request::build_request;
use super::retry::{AuthRetry, RetryDecision};
use crate::http::{HttpResponse, HttpTransport};
use crate::session::SessionManager;

/// Dispatches descriptors, attaching the session's bearer token and driving
/// the authorization-retry protocol on 401 responses
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    sessions: Arc<SessionManager>,
    max_auth_attempts: u32,
}

impl RequestPipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, sessions: Arc<SessionManager>) -> Self {
        Self { transport, sessions, max_auth_attempts: DEFAULT_MAX_AUTH_ATTEMPTS }
    }

    /// Total dispatches allowed per call, at least one
    #[must_use]
    pub fn with_max_auth_attempts(mut self, max_auth_attempts: u32) -> Self {
        self.max_auth_attempts = max_auth_attempts.max(1);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Send and return the raw success body, empty for 204/202.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, endpoint = %descriptor.endpoint))]
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<String> {
        let response = self.dispatch(descriptor).await?;
        ResponseDecoder::raw(&response)
    }

    /// Send and decode the success body as `T`.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, endpoint = %descriptor.endpoint))]
    pub async fn send_typed<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
        let response = self.dispatch(descriptor).await?;
        ResponseDecoder::decode(&response)
    }

    /// Serialize `body` as JSON, send, and decode the result as `T`.
    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut descriptor = RequestDescriptor::new(method, endpoint).with_json(body)?;
        if !requires_auth {
            descriptor = descriptor.unauthenticated();
        }
        self.send_typed(&descriptor).await
    }

    async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse> {
        if !descriptor.requires_auth {
            debug!("dispatching unauthenticated request");
            return self.transport.execute(build_request(descriptor, None)).await;
        }

        let mut bearer = self.sessions.bearer().await.ok_or_else(PostboxError::missing_token)?;
        let mut retry = AuthRetry::new(self.max_auth_attempts);

        loop {
            retry.record_dispatch();
            debug!(attempt = retry.attempts(), "dispatching request");
            let response = self.transport.execute(build_request(descriptor, Some(&bearer.token))).await?;

            match retry.observe(response.is_unauthorized()) {
                RetryDecision::Deliver => return Ok(response),
                RetryDecision::Exhausted => {
                    warn!(attempts = retry.attempts(), "authorization retries exhausted");
                    return Err(PostboxError::endpoint_unauthorized());
                }
                RetryDecision::Renew => {
                    if let Err(err) = self.sessions.renew_after(bearer.generation).await {
                        warn!(error = %err, kind = err.label(), "token renewal failed during retry");
                    }
                    match self.sessions.bearer().await {
                        Some(next) => bearer = next,
                        None => {
                            retry.exhaust();
                            warn!(attempts = retry.attempts(), "no session left after renewal");
                            return Err(PostboxError::endpoint_unauthorized());
                        }
                    }
                }
            }
        }
    }
}
