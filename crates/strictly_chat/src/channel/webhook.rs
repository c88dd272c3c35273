//! Delivery through the chat platform's HTTP send endpoint.

use super::{ChannelError, Mention, MessageChannel, OutboundMessage, SentMessage};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Debug, Serialize)]
struct AttachmentPayload<'a> {
    file_name: &'a str,
    content_type: &'a str,
    data_base64: String,
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    reply_to: Option<&'a str>,
    text: &'a str,
    mentions: &'a [Mention],
    attachment: Option<AttachmentPayload<'a>>,
}

#[derive(Debug, Deserialize)]
struct SendAck {
    message_id: String,
}

/// Posts each message as JSON and reads the new message id from the response.
///
/// Request body:
/// `{ "reply_to", "text", "mentions": [{ "id", "tag" }], "attachment": { "file_name", "content_type", "data_base64" } }`.
/// Expected response: `{ "message_id": "..." }`.
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl WebhookChannel {
    /// Creates a channel posting to `url`, authenticating with `token` as a
    /// bearer token when given.
    #[instrument(skip(token))]
    pub fn new(url: String, token: Option<String>) -> Self {
        info!(%url, authenticated = token.is_some(), "Creating webhook channel");
        Self {
            client: reqwest::Client::new(),
            url,
            token,
        }
    }
}

#[async_trait::async_trait]
impl MessageChannel for WebhookChannel {
    #[instrument(skip(self, message), fields(url = %self.url))]
    async fn send(&self, message: OutboundMessage) -> Result<SentMessage, ChannelError> {
        let payload = MessagePayload {
            reply_to: message.reply_to().as_deref(),
            text: message.text(),
            mentions: message.mentions(),
            attachment: message.attachment().as_ref().map(|a| AttachmentPayload {
                file_name: a.file_name(),
                content_type: a.content_type(),
                data_base64: base64::engine::general_purpose::STANDARD.encode(a.bytes()),
            }),
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let ack: SendAck = response.json().await.map_err(|e| {
            ChannelError::new(format!("Unreadable send acknowledgement: {}", e))
        })?;

        debug!(message_id = %ack.message_id, "Message accepted by platform");
        Ok(SentMessage::new(ack.message_id))
    }
}
