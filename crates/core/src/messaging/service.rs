//! Messaging service
//!
//! Inbox, message content and message creation on top of [`ApiService`].

use std::sync::Arc;

use postbox_domain::constants::endpoints;
use postbox_domain::{
    CreateMessage, ErrorRecord, HttpMethod, ReceivedMessage, ReceivedMessageStub, RequestDescriptor,
    SentMessage,
};

use crate::api::ApiService;

pub struct MessagingService {
    api: Arc<ApiService>,
}

impl MessagingService {
    pub fn new(api: Arc<ApiService>) -> Self {
        Self { api }
    }

    /// Stubs for each message in the inbox. Empty on failure.
    pub async fn get_inbox(
        &self,
        unread_only: bool,
        include_hidden: bool,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Vec<ReceivedMessageStub> {
        let endpoint =
            format!("{}?unreadOnly={unread_only}&hidden={include_hidden}", endpoints::INBOX);
        self.api
            .send::<Option<Vec<ReceivedMessageStub>>>(&RequestDescriptor::get(endpoint), on_error)
            .await
            .flatten()
            .unwrap_or_default()
    }

    /// Full content of one message, `None` if unavailable.
    pub async fn get_message_content(
        &self,
        id: &str,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<ReceivedMessage> {
        let endpoint = format!("{}/{}", endpoints::MESSAGES, urlencoding::encode(id));
        self.api.send(&RequestDescriptor::get(endpoint), on_error).await
    }

    pub async fn send_message(
        &self,
        message: &CreateMessage,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<SentMessage> {
        self.api.send_json(HttpMethod::Post, endpoints::MESSAGES, message, true, on_error).await
    }
}
