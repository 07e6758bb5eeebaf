//! Error types used throughout the client
//!
//! Every failure that reaches a caller is ultimately normalized into an
//! [`ErrorRecord`], the same `{ "type", "error" }` shape the remote service
//! uses for its own error bodies.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ENDPOINT_UNAUTHORIZED_DETAIL, MISSING_TOKEN_DETAIL, NO_CREDENTIAL_DETAIL};

/// Normalized, user-visible failure
///
/// Deserializes from the remote service's error body. Both fields are
/// required: a body missing either one is not an error record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// What kind of error
    #[serde(rename = "type")]
    pub kind: String,
    /// Error details
    #[serde(rename = "error")]
    pub detail: String,
}

impl ErrorRecord {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { kind: kind.into(), detail: detail.into() }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Main error type for the postbox client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PostboxError {
    /// Host unreachable, connection reset, body read failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Missing session or authorization retries exhausted
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success status decoded from the remote error body
    #[error("{kind}: {detail}")]
    RemoteRejected { kind: String, detail: String },

    /// Successful response whose body does not match the expected shape
    #[error("Failed to deserialize result: {0}")]
    Deserialization(String),

    /// Renewal attempted with neither an active session nor a saved credential
    #[error("No credential: {0}")]
    NoCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostboxError {
    /// Request requires authorization but no session is held.
    pub fn missing_token() -> Self {
        Self::Unauthorized(MISSING_TOKEN_DETAIL.to_string())
    }

    /// Authorization retries reached their bound.
    pub fn endpoint_unauthorized() -> Self {
        Self::Unauthorized(ENDPOINT_UNAUTHORIZED_DETAIL.to_string())
    }

    pub fn no_credential() -> Self {
        Self::NoCredential(NO_CREDENTIAL_DETAIL.to_string())
    }

    pub fn remote(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::RemoteRejected { kind: kind.into(), detail: detail.into() }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteRejected { .. })
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Unauthorized(_) => "unauthorized",
            Self::RemoteRejected { .. } => "remote_rejected",
            Self::Deserialization(_) => "deserialization",
            Self::NoCredential(_) => "no_credential",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }

    /// Normalize into the record delivered through error channels.
    pub fn to_record(&self) -> ErrorRecord {
        match self {
            Self::Transport(detail) => ErrorRecord::new("Transport Failure", detail),
            Self::Unauthorized(detail) => ErrorRecord::new("Unauthorized Access", detail),
            Self::RemoteRejected { kind, detail } => ErrorRecord::new(kind, detail),
            Self::Deserialization(detail) => {
                ErrorRecord::new("Failed To Deserialize Result", detail)
            }
            Self::NoCredential(detail) => ErrorRecord::new("No Credential", detail),
            Self::Config(detail) => ErrorRecord::new("Configuration Error", detail),
            Self::Storage(detail) => ErrorRecord::new("Credential Storage Error", detail),
            Self::Internal(detail) => ErrorRecord::new("Internal Error", detail),
        }
    }
}

impl From<ErrorRecord> for PostboxError {
    fn from(record: ErrorRecord) -> Self {
        Self::RemoteRejected { kind: record.kind, detail: record.detail }
    }
}

impl From<PostboxError> for ErrorRecord {
    fn from(err: PostboxError) -> Self {
        err.to_record()
    }
}

/// Result type alias for postbox operations
pub type Result<T> = std::result::Result<T, PostboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_record_uses_remote_field_names() {
        let record: ErrorRecord =
            serde_json::from_str(r#"{"type":"Not Found","error":"no such message"}"#).unwrap();
        assert_eq!(record.kind, "Not Found");
        assert_eq!(record.detail, "no such message");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"Not Found""#));
        assert!(json.contains(r#""error":"no such message""#));
    }

    #[test]
    fn error_record_requires_both_fields() {
        assert!(serde_json::from_str::<ErrorRecord>(r#"{"type":"Oops"}"#).is_err());
        assert!(serde_json::from_str::<ErrorRecord>("{}").is_err());
    }

    #[test]
    fn remote_rejection_is_surfaced_verbatim() {
        let err = PostboxError::from(ErrorRecord::new("Bad Request", "recipient missing"));
        assert_eq!(err.to_record(), ErrorRecord::new("Bad Request", "recipient missing"));
        assert!(err.is_remote());
    }

    #[test]
    fn unauthorized_helpers_carry_fixed_details() {
        assert_eq!(
            PostboxError::endpoint_unauthorized().to_record(),
            ErrorRecord::new(
                "Unauthorized Access",
                "Current user is not authorized to access this endpoint."
            )
        );
        assert_eq!(
            PostboxError::missing_token(),
            PostboxError::Unauthorized("missing or expired token".into())
        );
    }

    #[test]
    fn local_faults_have_distinct_kinds() {
        let deser = PostboxError::Deserialization("expected value".into()).to_record();
        let transport = PostboxError::Transport("connection reset".into()).to_record();
        assert_eq!(deser.kind, "Failed To Deserialize Result");
        assert_eq!(transport.kind, "Transport Failure");
        assert_ne!(deser.kind, transport.kind);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(PostboxError::no_credential().label(), "no_credential");
        assert_eq!(PostboxError::remote("a", "b").label(), "remote_rejected");
    }
}
