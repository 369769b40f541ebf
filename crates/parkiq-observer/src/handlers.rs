//! Read-only endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal live dashboard, or the snapshot feed on upgrade |
//! | `GET` | `/api/status` | Current snapshot |
//! | `GET` | `/api/health` | Liveness + observer count |

use std::sync::Arc;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use parkiq_types::Snapshot;

use crate::state::AppState;
use crate::ws;

// ---------------------------------------------------------------------------
// GET / -- minimal live dashboard
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with the current figures, or hand a
/// `WebSocket` upgrade on `/` to the snapshot feed.
///
/// Dashboards open their feed at the page origin (`ws://host`), so the
/// root path doubles as the observer endpoint. The page itself opens `/ws`
/// and rewrites the figures on every pushed snapshot.
pub async fn index(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if let Ok(upgrade) = upgrade {
        return upgrade
            .on_upgrade(|socket| ws::handle_ws(socket, state))
            .into_response();
    }

    let Snapshot {
        capacity,
        occupied,
        available,
        gate,
    } = state.facility.snapshot().await;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>ParkIQ</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        .full .value {{ color: #f85149; }}
        .open {{ color: #3fb950; }}
        .closed {{ color: #f85149; }}
    </style>
</head>
<body>
    <h1>ParkIQ</h1>
    <p class="subtitle">Live parking occupancy</p>

    <div>
        <div class="metric">
            <div class="label">Total</div>
            <div class="value" id="total">{capacity}</div>
        </div>
        <div class="metric">
            <div class="label">Occupied</div>
            <div class="value" id="occupied">{occupied}</div>
        </div>
        <div class="metric" id="available-card">
            <div class="label">Available</div>
            <div class="value" id="available">{available}</div>
        </div>
        <div class="metric">
            <div class="label">Gate</div>
            <div class="value {gate}" id="gate">{gate}</div>
        </div>
    </div>

    <script>
        const proto = window.location.protocol === "https:" ? "wss://" : "ws://";
        const ws = new WebSocket(`${{proto}}${{window.location.host}}/ws`);
        ws.onmessage = (event) => {{
            const data = JSON.parse(event.data);
            document.getElementById("total").innerText = data.total;
            document.getElementById("occupied").innerText = data.occupied;
            document.getElementById("available").innerText =
                data.available === 0 ? "FULL" : data.available;
            document.getElementById("available-card")
                .classList.toggle("full", data.available === 0);
            const gate = document.getElementById("gate");
            gate.innerText = data.gate;
            gate.className = `value ${{data.gate}}`;
        }};
    </script>
</body>
</html>"#
    ))
    .into_response()
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Return the current snapshot.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.facility.snapshot().await)
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness check with the number of connected observers.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let observers = state.facility.observer_count().await;
    Json(serde_json::json!({
        "status": "ok",
        "observers": observers,
    }))
}
