//! Outbound message delivery.

mod memory;
mod webhook;

pub use memory::{Delivered, MemoryChannel};
pub use webhook::WebhookChannel;

use crate::session::{MessageId, ParticipantId};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A participant highlighted in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Mention {
    /// Participant id.
    pub id: ParticipantId,
    /// Text the platform highlights, e.g. `@Alice`.
    pub tag: String,
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Attachment {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A message to post into the chat.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct OutboundMessage {
    text: String,
    mentions: Vec<Mention>,
    attachment: Option<Attachment>,
    reply_to: Option<MessageId>,
}

impl OutboundMessage {
    /// Creates a text-only message.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mentions: Vec::new(),
            attachment: None,
            reply_to: None,
        }
    }

    /// Adds a mention.
    pub fn with_mention(mut self, mention: Mention) -> Self {
        self.mentions.push(mention);
        self
    }

    /// Attaches a file.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Threads the message as a reply to `message_id`.
    pub fn in_reply_to(mut self, message_id: impl Into<MessageId>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// Acknowledgement of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct SentMessage {
    id: MessageId,
}

/// Delivery failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Channel error: {} at {}:{}", message, file, line)]
pub struct ChannelError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ChannelError {
    /// Creates a new channel error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ChannelError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

/// Delivers messages into the chat and reports the id each one received.
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
    /// Sends one message. Exactly one delivery is attempted.
    async fn send(&self, message: OutboundMessage) -> Result<SentMessage, ChannelError>;
}
