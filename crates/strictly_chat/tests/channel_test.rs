//! Tests for outbound message building and in-memory delivery.

use strictly_chat::{Attachment, Mention, MemoryChannel, MessageChannel, OutboundMessage};

#[test]
fn test_plain_message_builder() {
    let message = OutboundMessage::plain("Your move")
        .with_mention(Mention::new("u2".to_string(), "@Bob".to_string()))
        .with_attachment(Attachment::new("board.txt", "text/plain", b"...".to_vec()))
        .in_reply_to("m1");

    assert_eq!(message.text(), "Your move");
    assert_eq!(message.mentions().len(), 1);
    assert_eq!(message.mentions()[0].tag, "@Bob");
    assert_eq!(
        message.attachment().as_ref().map(|a| a.file_name().as_str()),
        Some("board.txt")
    );
    assert_eq!(message.reply_to().as_deref(), Some("m1"));
}

#[tokio::test]
async fn test_memory_channel_numbers_deliveries() {
    let channel = MemoryChannel::new();

    let first = channel
        .send(OutboundMessage::plain("one"))
        .await
        .expect("Send failed");
    let second = channel
        .send(OutboundMessage::plain("two").in_reply_to(first.id().clone()))
        .await
        .expect("Send failed");

    assert_eq!(first.id(), "m1");
    assert_eq!(second.id(), "m2");
    let last = channel.last().expect("Nothing delivered");
    assert_eq!(last.message().text(), "two");
    assert_eq!(last.message().reply_to().as_deref(), Some("m1"));
}

#[tokio::test]
async fn test_memory_channel_failure_is_not_recorded() {
    let channel = MemoryChannel::new();
    channel.fail_next(1);

    let failed = channel.send(OutboundMessage::plain("lost")).await;
    let sent = channel
        .send(OutboundMessage::plain("kept"))
        .await
        .expect("Send failed");

    assert!(failed.is_err());
    assert_eq!(sent.id(), "m1");
    assert_eq!(channel.len(), 1);
}
