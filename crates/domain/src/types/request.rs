//! Request descriptors
//!
//! A [`RequestDescriptor`] is the transport-agnostic description of one
//! remote call. The bearer token is attached later, per dispatch, so a
//! descriptor can be re-sent unchanged after a token renewal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PostboxError, Result};

/// HTTP verbs the client issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("Invalid HttpMethod: {s}")),
        }
    }
}

/// One remote call: verb, endpoint relative to the base URL, optional JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub endpoint: String,
    body: Option<String>,
    /// Whether the call participates in the authorization-retry protocol
    pub requires_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self { method, endpoint: endpoint.into(), body: None, requires_auth: true }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    /// Attach a pre-serialized JSON body. An empty body means no body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn with_json<B: Serialize + ?Sized>(self, value: &B) -> Result<Self> {
        let body = serde_json::to_string(value)
            .map_err(|e| PostboxError::Internal(format!("failed to serialize request body: {e}")))?;
        Ok(self.with_body(body))
    }

    /// Skip bearer attachment and the retry protocol (login, register, forgot).
    #[must_use]
    pub fn unauthenticated(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
