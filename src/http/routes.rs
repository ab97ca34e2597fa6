//! HTTP routes: room creation and shared state.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::room::manager::RoomManager;

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomManager>,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
}

pub async fn create_room(State(state): State<AppState>) -> Json<CreateRoomResponse> {
    let room_id = state.rooms.create_room();
    Json(CreateRoomResponse { room_id })
}

pub async fn healthz() -> &'static str {
    "ok"
}
