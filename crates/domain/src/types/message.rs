//! Message records exchanged with the messaging endpoints
//!
//! Content travels as raw bytes (`messageContent`, base64 on the wire) with a
//! free-form `contentType` describing how to interpret them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde::{base64_bytes, lenient_datetime, lenient_datetime_opt};

/// Full message as seen by its sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: String,
    pub sender: String,
    #[serde(with = "base64_bytes", default)]
    pub message_content: Vec<u8>,
    #[serde(default)]
    pub content_type: String,
    #[serde(with = "lenient_datetime")]
    pub sent: DateTime<Utc>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Summary of a sent message without its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessageStub {
    pub id: String,
    pub sender: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content_length: u64,
    #[serde(with = "lenient_datetime")]
    pub sent: DateTime<Utc>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Full message as seen by one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub id: String,
    pub sender: String,
    #[serde(with = "base64_bytes", default)]
    pub message_content: Vec<u8>,
    #[serde(default)]
    pub content_type: String,
    #[serde(with = "lenient_datetime")]
    pub sent: DateTime<Utc>,
    #[serde(default)]
    pub recipient: String,
    /// Absent until the recipient opens the message
    #[serde(with = "lenient_datetime_opt", default)]
    pub read: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hidden: bool,
}

impl ReceivedMessage {
    /// Content decoded as UTF-8 when the content type is textual.
    pub fn text(&self) -> Option<&str> {
        if self.content_type.is_empty() || self.content_type.starts_with("text/") {
            std::str::from_utf8(&self.message_content).ok()
        } else {
            None
        }
    }
}

/// Inbox entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessageStub {
    pub id: String,
    pub sender: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content_length: u64,
    #[serde(with = "lenient_datetime")]
    pub sent: DateTime<Utc>,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// Body for `POST api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage {
    #[serde(with = "base64_bytes")]
    pub message_content: Vec<u8>,
    pub content_type: String,
    pub recipients: Vec<String>,
    #[serde(with = "lenient_datetime_opt", default, skip_serializing_if = "Option::is_none")]
    pub self_destruct: Option<DateTime<Utc>>,
}

impl CreateMessage {
    /// Plain-text message to the given recipients.
    pub fn text<I, S>(content: impl Into<String>, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message_content: content.into().into_bytes(),
            content_type: "text/plain".to_string(),
            recipients: recipients.into_iter().map(Into::into).collect(),
            self_destruct: None,
        }
    }

    #[must_use]
    pub fn self_destruct_at(mut self, at: DateTime<Utc>) -> Self {
        self.self_destruct = Some(at);
        self
    }
}
