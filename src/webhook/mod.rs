
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    payloads::{OverseerrPayload, TautulliLastEpisodePayload, TautulliTranscodePayload},
    relay::{RelayError, RelayService},
};

/// Builds the webhook router.
pub fn router(relay: Arc<RelayService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhooks/overseerr", post(overseerr_handler))
        .route("/webhooks/tautulli/transcode", post(transcode_handler))
        .route("/webhooks/tautulli/last-episode", post(last_episode_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn overseerr_handler(
    State(relay): State<Arc<RelayService>>,
    Json(payload): Json<OverseerrPayload>,
) -> Result<Json<Value>, StatusCode> {
    relay.process_overseerr(payload).await.map(accepted).map_err(internal_error)
}

async fn transcode_handler(
    State(relay): State<Arc<RelayService>>,
    Json(payload): Json<TautulliTranscodePayload>,
) -> Result<Json<Value>, StatusCode> {
    relay.process_transcode(payload).await.map(accepted).map_err(internal_error)
}

async fn last_episode_handler(
    State(relay): State<Arc<RelayService>>,
    Json(payload): Json<TautulliLastEpisodePayload>,
) -> Result<Json<Value>, StatusCode> {
    relay.process_last_episode(payload).await.map(accepted).map_err(internal_error)
}

fn accepted(_: ()) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn internal_error(e: RelayError) -> StatusCode {
    error!("Failed to process webhook: {e:?}");
    StatusCode::INTERNAL_SERVER_ERROR
}
