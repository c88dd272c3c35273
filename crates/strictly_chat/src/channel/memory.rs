//! In-process channel for the console front end and tests.

use super::{ChannelError, MessageChannel, OutboundMessage, SentMessage};
use crate::session::MessageId;
use derive_getters::Getters;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};

/// A message accepted by a [`MemoryChannel`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Delivered {
    id: MessageId,
    message: OutboundMessage,
}

#[derive(Debug, Default)]
struct Inbox {
    next_id: u64,
    delivered: Vec<Delivered>,
    failures_pending: usize,
}

/// Channel that keeps every message in memory and numbers them `m1`, `m2`, ...
///
/// With echo enabled each message is also printed to stdout, which is how the
/// console front end shows the conversation.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    inbox: Mutex<Inbox>,
    echo: bool,
}

impl MemoryChannel {
    /// Creates a silent channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel that prints each delivered message.
    pub fn echoing() -> Self {
        Self {
            inbox: Mutex::default(),
            echo: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inbox> {
        self.inbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next `count` sends fail.
    #[instrument(skip(self))]
    pub fn fail_next(&self, count: usize) {
        self.lock().failures_pending = count;
    }

    /// All delivered messages, oldest first.
    pub fn delivered(&self) -> Vec<Delivered> {
        self.lock().delivered.clone()
    }

    /// The most recently delivered message.
    pub fn last(&self) -> Option<Delivered> {
        self.lock().delivered.last().cloned()
    }

    /// Number of delivered messages.
    pub fn len(&self) -> usize {
        self.lock().delivered.len()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.lock().delivered.is_empty()
    }
}

#[async_trait::async_trait]
impl MessageChannel for MemoryChannel {
    #[instrument(skip(self, message), fields(text = %message.text()))]
    async fn send(&self, message: OutboundMessage) -> Result<SentMessage, ChannelError> {
        let mut inbox = self.lock();

        if inbox.failures_pending > 0 {
            inbox.failures_pending -= 1;
            warn!("Simulated delivery failure");
            return Err(ChannelError::new("Delivery refused"));
        }

        inbox.next_id += 1;
        let id = format!("m{}", inbox.next_id);
        debug!(%id, "Message delivered");

        if self.echo {
            print_message(&id, &message);
        }

        inbox.delivered.push(Delivered {
            id: id.clone(),
            message,
        });
        Ok(SentMessage::new(id))
    }
}

fn print_message(id: &str, message: &OutboundMessage) {
    match message.reply_to() {
        Some(parent) => println!("[{id}] (re {parent}) {}", message.text()),
        None => println!("[{id}] {}", message.text()),
    }
    if let Some(attachment) = message.attachment() {
        println!("{}", String::from_utf8_lossy(attachment.bytes()));
    }
}
