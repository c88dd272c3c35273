//! HTTP ingress for chat platform events.

use crate::correlator::SessionError;
use crate::events::{EventOutcome, EventRouter, InboundEvent};
use crate::registry::CorrelationRegistry;
use crate::rules::RulesEngine;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Longest pause between idle sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Collaborator failure reported as `502 Bad Gateway`.
#[derive(Debug)]
pub struct ServerError(SessionError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Event handling failed");
        (StatusCode::BAD_GATEWAY, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Builds the router:
///
/// - `POST /events` takes an [`InboundEvent`] and answers with the
///   [`EventOutcome`];
/// - `GET /health` reports liveness and the number of active sessions.
pub fn build_router<E: RulesEngine>(bot: Arc<EventRouter<E>>) -> Router {
    Router::new()
        .route("/events", post(post_event::<E>))
        .route("/health", get(health::<E>))
        .with_state(bot)
}

#[instrument(skip(bot, event))]
async fn post_event<E: RulesEngine>(
    State(bot): State<Arc<EventRouter<E>>>,
    Json(event): Json<InboundEvent>,
) -> Result<Json<EventOutcome>, ServerError> {
    debug!(?event, "Incoming event");
    let outcome = bot.dispatch(event).await.map_err(ServerError)?;
    info!(?outcome, "Event handled");
    Ok(Json(outcome))
}

async fn health<E: RulesEngine>(State(bot): State<Arc<EventRouter<E>>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "active_sessions": bot.correlator().registry().len(),
    }))
}

/// Periodically evicts sessions idle for longer than `ttl`.
#[instrument(skip(registry))]
pub fn spawn_idle_sweeper<S: Send + 'static>(
    registry: CorrelationRegistry<S>,
    ttl: chrono::Duration,
) -> JoinHandle<()> {
    let period = ttl
        .to_std()
        .unwrap_or(MAX_SWEEP_INTERVAL)
        .clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);
    info!(?period, "Starting idle session sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            registry.evict_idle(ttl, chrono::Utc::now());
        }
    })
}

/// Runs `server` alongside an optional sweeper.
///
/// The sweeper is aborted when the server stops. If the sweeper ends first
/// (it only ends by panicking) the server is dropped and an error returned.
pub async fn supervise<F>(server: F, sweeper: Option<JoinHandle<()>>) -> anyhow::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let Some(mut sweeper) = sweeper else {
        return Ok(server.await?);
    };

    tokio::select! {
        served = server => {
            sweeper.abort();
            info!("Server stopped, idle sweeper aborted");
            Ok(served?)
        }
        joined = &mut sweeper => {
            error!(?joined, "Idle session sweeper stopped");
            anyhow::bail!("Idle session sweeper stopped: {:?}", joined)
        }
    }
}

/// Serves the event router on `host:port` until the listener fails.
#[instrument(skip(bot))]
pub async fn serve<E: RulesEngine>(
    bot: Arc<EventRouter<E>>,
    host: String,
    port: u16,
    ttl: Option<chrono::Duration>,
) -> anyhow::Result<()> {
    let sweeper = ttl.map(|ttl| spawn_idle_sweeper(bot.correlator().registry().clone(), ttl));

    let app = build_router(bot);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{}:{}/", host, port);

    supervise(axum::serve(listener, app).into_future(), sweeper).await
}
