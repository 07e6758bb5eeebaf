//! Port interfaces for HTTP dispatch
//!
//! The core never talks to the network itself. Infrastructure provides an
//! [`HttpTransport`] that resolves endpoints against the configured base URL
//! and reports every completed exchange as an [`HttpResponse`], whatever its
//! status.

use std::fmt;

use async_trait::async_trait;
use postbox_domain::{HttpMethod, Result};

/// A fully built request, ready for one dispatch
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path (and query) relative to the base URL
    pub endpoint: String,
    pub bearer_token: Option<String>,
    /// Sent with `Content-Type: application/json` when present
    pub json_body: Option<String>,
}

impl HttpRequest {
    pub fn is_authorized(&self) -> bool {
        self.bearer_token.is_some()
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("has_body", &self.json_body.is_some())
            .finish()
    }
}

/// A completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase, if the status has one
    pub reason: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, reason: None, body: body.into() }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 204 No Content or 202 Accepted; the body is ignored.
    pub fn is_empty_success(&self) -> bool {
        matches!(self.status, 202 | 204)
    }
}

/// Trait for dispatching one request
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Dispatch `request` once.
    ///
    /// Returns `Err(PostboxError::Transport)` only when no response was
    /// received; non-success statuses are returned as `Ok`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
