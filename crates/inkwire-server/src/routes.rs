//! HTTP surface: room administration and log fetches.

use crate::connection::ws_handler;
use crate::storage::StorageError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Assemble the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .route("/api/room", post(create_room))
        .route("/api/room/slug/{slug}", get(room_by_slug))
        .route("/api/room/{id}", get(room_log))
        .route("/api/room/{id}/content", delete(clear_room))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "Inkwire Relay Server - Connect via WebSocket at /ws"
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct CreateRoom {
    slug: String,
}

async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRoom>,
) -> Result<Response, Response> {
    let room = state
        .store
        .create_room(&body.slug)
        .await
        .map_err(storage_response)?;
    info!(room_id = room.id, slug = %room.slug, "room created");
    Ok((StatusCode::CREATED, Json(json!({ "room": room }))).into_response())
}

async fn room_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, Response> {
    let room = state
        .store
        .resolve_slug(&slug)
        .await
        .map_err(storage_response)?;
    Ok(Json(json!({ "room": room })).into_response())
}

async fn room_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    let messages = state.store.fetch_log(id).await.map_err(storage_response)?;
    Ok(Json(json!({ "messages": messages })).into_response())
}

async fn clear_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    state.store.clear_room(id).await.map_err(storage_response)?;
    info!(room_id = id, "room content cleared");
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn storage_response(err: StorageError) -> Response {
    let status = match &err {
        StorageError::RoomNotFound(_) | StorageError::SlugNotFound(_) => StatusCode::NOT_FOUND,
        StorageError::SlugTaken(_) => StatusCode::CONFLICT,
        StorageError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
