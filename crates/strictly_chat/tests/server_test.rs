//! Tests for the HTTP ingress.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use strictly_chat::{
    CorrelationRegistry, DirectoryResolver, EventRouter, GameSession, MemoryChannel, Seating,
    SessionCorrelator, Side, TextRenderer, TicTacToeEngine, build_router, spawn_idle_sweeper,
    supervise,
};

fn bot(channel: Arc<MemoryChannel>) -> Arc<EventRouter<TicTacToeEngine>> {
    let correlator = SessionCorrelator::new(
        TicTacToeEngine,
        CorrelationRegistry::new(),
        Arc::new(TextRenderer::new()),
        Arc::new(DirectoryResolver::default()),
        channel,
    );
    Arc::new(EventRouter::new(correlator, "tictactoe".to_string(), "!".to_string()))
}

async fn post(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_command_then_reply() {
    let bot = bot(Arc::new(MemoryChannel::new()));
    let app = build_router(bot.clone());

    let (status, body) = post(
        app.clone(),
        json!({ "kind": "command", "message_id": "c1", "sender": "alice", "command": "!tictactoe", "mentions": ["bob"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "started", "token": "m1" }));

    let (status, body) = post(
        app,
        json!({ "kind": "reply", "message_id": "c2", "reply_to": "m1", "sender": "alice", "text": "5" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "continued", "token": "m2" }));
    assert!(bot.correlator().registry().contains("m2"));
}

#[tokio::test]
async fn test_unknown_command_reported() {
    let channel = Arc::new(MemoryChannel::new());
    let app = build_router(bot(channel.clone()));

    let (status, body) = post(
        app,
        json!({ "kind": "command", "message_id": "c1", "sender": "alice", "command": "chess" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "unknown_command", "command": "chess" }));
    assert!(channel.is_empty());
}

#[tokio::test]
async fn test_delivery_failure_is_bad_gateway() {
    let channel = Arc::new(MemoryChannel::new());
    channel.fail_next(1);
    let app = build_router(bot(channel));

    let (status, body) = post(
        app,
        json!({ "kind": "command", "message_id": "c1", "sender": "alice", "command": "tictactoe", "mentions": ["bob"] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().expect("No error").contains("Delivery refused"));
}

#[tokio::test]
async fn test_malformed_event_rejected() {
    let app = build_router(bot(Arc::new(MemoryChannel::new())));

    let (status, _) = post(app, json!({ "kind": "wave", "sender": "alice" })).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let bot = bot(Arc::new(MemoryChannel::new()));
    bot.correlator()
        .start_session("c1", "alice", Some("bob"))
        .await
        .expect("Start failed");

    let response = build_router(bot)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("Invalid JSON");
    assert_eq!(body, json!({ "status": "ok", "active_sessions": 1 }));
}

fn stale_registry() -> CorrelationRegistry<u8> {
    let registry = CorrelationRegistry::new();
    let seating = Seating::new("alice".to_string(), "bob".to_string(), Side::First);
    let long_ago = chrono::Utc::now() - chrono::Duration::hours(1);
    registry.insert(GameSession::new(0, seating, "m1".to_string(), long_ago));
    registry
}

#[tokio::test]
async fn test_sweeper_evicts_idle_sessions() {
    let registry = stale_registry();

    let sweeper = spawn_idle_sweeper(registry.clone(), chrono::Duration::minutes(5));
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    sweeper.abort();

    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_supervise_aborts_sweeper_when_server_stops() {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let sweeper = tokio::spawn(async move {
        let _held = tx;
        std::future::pending::<()>().await;
    });

    supervise(async { Ok(()) }, Some(sweeper))
        .await
        .expect("Supervise failed");

    assert!(rx.await.is_err(), "Sweeper still running");
}

#[tokio::test]
async fn test_supervise_reports_sweeper_panic() {
    let sweeper = tokio::spawn(async {
        panic!("sweeper exploded");
    });

    let result = supervise(std::future::pending::<std::io::Result<()>>(), Some(sweeper)).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_supervise_without_sweeper_returns_server_result() {
    let result = supervise(
        async { Err(std::io::Error::other("listener closed")) },
        None,
    )
    .await;

    assert!(result.is_err());
}
