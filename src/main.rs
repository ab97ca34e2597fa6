use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pokepucks::http::routes::{self, AppState};
use pokepucks::room::manager::RoomManager;
use pokepucks::ws::connection::ws_handler;
use pokepucks::{config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let state = AppState {
        rooms: Arc::new(RoomManager::new()),
    };

    let app = Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/rooms", post(routes::create_room))
        .route("/rooms/:id/ws", get(ws_handler))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
