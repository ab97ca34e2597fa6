//! WebSocket connection lifecycle: seat a player, gate the start on both
//! seats being ready, drive the match one step per request, broadcast
//! snapshots.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::Snapshot;
use crate::http::routes::AppState;
use crate::room::manager::{Room, SeatView};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// This seat is ready to play. When both seats are ready the match starts.
    Ready,
    /// Advance the match one phase.
    Step,
    Ping,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome { room_id: String, slot: usize },
    RoomUpdate { players: Vec<SeatView> },
    MatchStarted { snapshot: Snapshot },
    MatchState { snapshot: Snapshot },
    Error { message: String },
    Pong,
}

#[derive(Deserialize)]
pub struct WsParams {
    pub name: String,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(WsParams { name }): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if state.rooms.get(&room_id).is_none() {
        return (StatusCode::NOT_FOUND, "room not found").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(state, socket, room_id, name))
}

async fn handle_socket(state: AppState, socket: WebSocket, room_id: String, name: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sv_tx, mut sv_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let (room, slot) = match state.rooms.join(&room_id, name, sv_tx.clone()) {
        Ok(joined) => joined,
        Err(err) => {
            let msg = ServerMessage::Error {
                message: err.to_string(),
            };
            let _ = ws_tx
                .send(Message::Text(serde_json::to_string(&msg).unwrap_or_default()))
                .await;
            return;
        }
    };

    // Forward server pushes to the socket.
    tokio::spawn(async move {
        while let Some(msg) = sv_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else { break };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let _ = sv_tx.send(ServerMessage::Welcome {
        room_id: room.id.clone(),
        slot,
    });
    room.broadcast(&ServerMessage::RoomUpdate {
        players: room.seat_views(),
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ready) => on_ready(&state, &room, slot),
                Ok(ClientMessage::Step) => on_step(&state, &room, &sv_tx),
                Ok(ClientMessage::Ping) => {
                    let _ = sv_tx.send(ServerMessage::Pong);
                }
                Err(err) => {
                    let _ = sv_tx.send(ServerMessage::Error {
                        message: format!("bad message: {err}"),
                    });
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.rooms.leave(&room, slot);
    if state.rooms.get(&room.id).is_some() {
        room.broadcast(&ServerMessage::RoomUpdate {
            players: room.seat_views(),
        });
    }
    debug!(room_id = %room.id, slot, "ws closed");
}

fn on_ready(state: &AppState, room: &Arc<Room>, slot: usize) {
    let all_ready = state.rooms.mark_ready(room, slot);
    room.broadcast(&ServerMessage::RoomUpdate {
        players: room.seat_views(),
    });
    if all_ready {
        match state.rooms.registry().start_match(&room.id) {
            Ok(snapshot) => room.broadcast(&ServerMessage::MatchStarted { snapshot }),
            // Second ready of a re-readied pair; the running match stands.
            Err(err) => debug!(room_id = %room.id, %err, "start ignored"),
        }
    }
}

/// One step request advances the match exactly one phase. Failures go back to
/// the requester only; nothing is broadcast.
fn on_step(state: &AppState, room: &Arc<Room>, sv_tx: &mpsc::UnboundedSender<ServerMessage>) {
    match state.rooms.registry().step(&room.id) {
        Ok(snapshot) => room.broadcast(&ServerMessage::MatchState { snapshot }),
        Err(err) => {
            let _ = sv_tx.send(ServerMessage::Error {
                message: err.to_string(),
            });
        }
    }
}
