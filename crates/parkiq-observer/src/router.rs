//! Axum router construction for the ParkIQ server.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled so a separately hosted dashboard can
//! call the API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, mutation, ws};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- live HTML dashboard, or the `WebSocket` feed on upgrade
/// - `GET /ws` -- `WebSocket` snapshot feed
/// - `GET /api/status` -- current snapshot
/// - `GET /api/health` -- liveness check
/// - `POST /api/increment` -- a car entered
/// - `POST /api/decrement` -- a car left
/// - `POST /api/gate/open` -- raise the gate
/// - `POST /api/gate/close` -- lower the gate
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard (and feed, for clients that upgrade at the origin)
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_observe))
        // Reads
        .route("/api/status", get(handlers::status))
        .route("/api/health", get(handlers::health))
        // Mutations
        .route("/api/increment", post(mutation::increment))
        .route("/api/decrement", post(mutation::decrement))
        .route("/api/gate/open", post(mutation::open_gate))
        .route("/api/gate/close", post(mutation::close_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
