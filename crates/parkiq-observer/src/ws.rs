//! `WebSocket` handler for the live snapshot feed.
//!
//! Clients connect to `GET /ws` or upgrade on `GET /`. The first frame is the current snapshot;
//! after that the client receives one JSON [`Snapshot`] per state change.
//! The feed is read-only: text and binary frames from the client are
//! ignored, pings are answered.
//!
//! The connection ends when the client closes, when a send to the client
//! fails or times out, or when the broadcaster drops this observer
//! because its queue filled up.
//!
//! [`Snapshot`]: parkiq_types::Snapshot

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use parkiq_core::ObserverHandle;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upper bound on a single frame write to a client.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming snapshots.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_observe(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Run one observer connection until either side goes away, then
/// unregister it.
pub(crate) async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let ObserverHandle { id, mut receiver } = state.facility.connect().await;
    debug!(observer = %id, "WebSocket observer connected");

    loop {
        tokio::select! {
            // Snapshot addressed to this observer.
            update = receiver.recv() => {
                let Some(snapshot) = update else {
                    debug!(observer = %id, "Observer dropped by broadcaster");
                    break;
                };
                let json = match serde_json::to_string(&snapshot) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to serialize snapshot: {e}");
                        continue;
                    }
                };
                if !send_with_timeout(&mut socket, Message::Text(json.into())).await {
                    debug!(observer = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(observer = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if !send_with_timeout(&mut socket, Message::Pong(data)).await {
                            debug!(observer = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(observer = %id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // The feed is read-only; other client frames carry no meaning.
                    }
                }
            }
        }
    }

    state.facility.disconnect(id).await;
}

/// Returns `false` if the frame could not be written within
/// [`SEND_TIMEOUT`].
async fn send_with_timeout(socket: &mut WebSocket, msg: Message) -> bool {
    matches!(
        tokio::time::timeout(SEND_TIMEOUT, socket.send(msg)).await,
        Ok(Ok(()))
    )
}
