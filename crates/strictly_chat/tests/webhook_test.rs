//! Tests for the webhook channel against a local stand-in platform.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine as _;
use serde_json::{Value, json};

use strictly_chat::{Attachment, Mention, MessageChannel, OutboundMessage, WebhookChannel};

#[derive(Clone, Default)]
struct Received {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

async fn accept(State(received): State<Received>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    received.auth.lock().expect("Lock poisoned").push(auth);
    let mut bodies = received.bodies.lock().expect("Lock poisoned");
    bodies.push(body);
    Json(json!({ "message_id": format!("w{}", bodies.len()) }))
}

async fn refuse() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

/// Serves `app` on an ephemeral port and returns its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_posts_message_and_reads_id() {
    let received = Received::default();
    let base = spawn(Router::new().route("/send", post(accept)).with_state(received.clone())).await;
    let channel = WebhookChannel::new(format!("{}/send", base), Some("secret".to_string()));

    let message = OutboundMessage::plain("It's X's turn (@Alice)")
        .with_mention(Mention::new("u1".to_string(), "@Alice".to_string()))
        .with_attachment(Attachment::new("board.txt", "text/plain", b"grid".to_vec()))
        .in_reply_to("c1");

    let sent = channel.send(message).await.expect("Send failed");

    assert_eq!(sent.id(), "w1");
    let bodies = received.bodies.lock().expect("Lock poisoned").clone();
    assert_eq!(
        bodies[0],
        json!({
            "reply_to": "c1",
            "text": "It's X's turn (@Alice)",
            "mentions": [{ "id": "u1", "tag": "@Alice" }],
            "attachment": {
                "file_name": "board.txt",
                "content_type": "text/plain",
                "data_base64": base64::engine::general_purpose::STANDARD.encode(b"grid"),
            },
        })
    );
    let auth = received.auth.lock().expect("Lock poisoned").clone();
    assert_eq!(auth, vec![Some("Bearer secret".to_string())]);
}

#[tokio::test]
async fn test_plain_message_without_token() {
    let received = Received::default();
    let base = spawn(Router::new().route("/send", post(accept)).with_state(received.clone())).await;
    let channel = WebhookChannel::new(format!("{}/send", base), None);

    channel
        .send(OutboundMessage::plain("The game ended in a draw!"))
        .await
        .expect("Send failed");

    let bodies = received.bodies.lock().expect("Lock poisoned").clone();
    assert_eq!(bodies[0]["reply_to"], Value::Null);
    assert_eq!(bodies[0]["attachment"], Value::Null);
    assert_eq!(received.auth.lock().expect("Lock poisoned")[0], None);
}

#[tokio::test]
async fn test_platform_error_is_channel_error() {
    let base = spawn(Router::new().route("/send", post(refuse))).await;
    let channel = WebhookChannel::new(format!("{}/send", base), None);

    let result = channel.send(OutboundMessage::plain("hello")).await;

    assert!(result.is_err());
}
