//! Per-connection lifecycle: authenticate, register, relay, unregister.

use crate::envelope::{ClientEnvelope, ServerEnvelope};
use crate::router::ConnectionId;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{info, warn};

/// WebSocket upgrade handler. The token travels in the query string;
/// verification failure refuses the upgrade before any state is created.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let token = match params.get("token") {
        Some(token) => token.clone(),
        None => {
            warn!("upgrade refused: missing token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };
    let user_id = match state.verifier.verify(&token) {
        Ok(user_id) => user_id,
        Err(err) => {
            warn!("upgrade refused: {err}");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
        .into_response()
}

/// Drive one authenticated connection until it closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let (outbound_tx, mut outbound_rx) = unbounded_channel::<String>();
    let conn = state.router.register(&user_id, outbound_tx);
    info!(connection = %conn, user = %user_id, "connection open");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&state, conn, &user_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ignore ping/pong/binary.
                    Some(Err(err)) => {
                        warn!(connection = %conn, "socket error: {err}");
                        break;
                    }
                }
            }

            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(frame) => {
                        if sender.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    state.router.unregister(conn);
    info!(connection = %conn, "connection closed");
}

/// Handle one inbound text frame. Malformed frames are dropped with a log
/// line; the connection stays open.
pub async fn handle_frame(state: &AppState, conn: ConnectionId, user_id: &str, text: &str) {
    let envelope = match serde_json::from_str::<ClientEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(connection = %conn, "dropping malformed frame: {err}");
            return;
        }
    };

    match envelope {
        ClientEnvelope::JoinRoom { room_id } => state.router.join(conn, room_id),
        ClientEnvelope::LeaveRoom { room_id } => state.router.leave(conn, room_id),
        ClientEnvelope::Chat { room_id, message } => {
            handle_chat(state, conn, user_id, room_id, message).await;
        }
    }
}

/// Persist a chat operation, then fan it out to the room.
///
/// Fan-out happens only after the append succeeds, so a peer never
/// observes an operation the store has not recorded. A persist failure is
/// logged and the frame is dropped; there is no in-protocol signal back to
/// the sender.
async fn handle_chat(
    state: &AppState,
    conn: ConnectionId,
    user_id: &str,
    room_id: i64,
    message: Value,
) {
    if message.is_null() || message.as_str().is_some_and(str::is_empty) {
        warn!(connection = %conn, room_id, "dropping chat with empty payload");
        return;
    }

    let serialized = match serde_json::to_string(&message) {
        Ok(serialized) => serialized,
        Err(err) => {
            warn!(connection = %conn, "unserializable chat payload: {err}");
            return;
        }
    };

    if let Err(err) = state.store.append(room_id, &serialized, user_id).await {
        warn!(connection = %conn, room_id, "persist failed, skipping fan-out: {err}");
        return;
    }

    match serde_json::to_string(&ServerEnvelope::Chat { room_id, message }) {
        Ok(frame) => {
            let delivered = state.router.fan_out(room_id, conn, &frame);
            tracing::debug!(connection = %conn, room_id, delivered, "chat relayed");
        }
        Err(err) => warn!(connection = %conn, "failed to encode fan-out frame: {err}"),
    }
}
