//! Response decoding
//!
//! Turns a completed [`HttpResponse`] into either a typed value or a
//! [`PostboxError`]. Non-success bodies are read as the service's own
//! `{ "type", "error" }` record when possible; anything else is wrapped
//! verbatim under the status reason phrase.

use postbox_domain::{ErrorRecord, PostboxError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::HttpResponse;

/// Stateless decoder for completed responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decode a typed success value or the reported failure.
    ///
    /// 204 and 202 bodies are ignored and the value is decoded from JSON
    /// `null`, so `()` and `Option<T>` succeed while concrete records fail
    /// with a deserialization error.
    pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
        if !response.is_success() {
            return Err(Self::error(response));
        }

        let decoded = if response.is_empty_success() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_str(&response.body)
        };
        decoded.map_err(|e| PostboxError::Deserialization(e.to_string()))
    }

    /// Raw body of a success, empty for 204/202.
    pub fn raw(response: &HttpResponse) -> Result<String> {
        if !response.is_success() {
            return Err(Self::error(response));
        }
        if response.is_empty_success() {
            return Ok(String::new());
        }
        Ok(response.body.clone())
    }

    /// Error record for a non-success response.
    pub fn error_record(response: &HttpResponse) -> ErrorRecord {
        serde_json::from_str::<ErrorRecord>(&response.body).unwrap_or_else(|_| {
            let kind = response
                .reason
                .clone()
                .filter(|reason| !reason.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            ErrorRecord::new(kind, response.body.clone())
        })
    }

    pub fn error(response: &HttpResponse) -> PostboxError {
        Self::error_record(response).into()
    }
}
