//! Mutation endpoints that drive the facility.
//!
//! Each handler routes to exactly one [`Facility`](parkiq_core::Facility)
//! operation. Validation of the occupancy bounds lives in the facility;
//! these handlers only map its result onto HTTP. The request body is not
//! read, so any payload a client sends is ignored.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/increment` | A car entered |
//! | `POST` | `/api/decrement` | A car left |
//! | `POST` | `/api/gate/open` | Raise the gate |
//! | `POST` | `/api/gate/close` | Lower the gate |

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use parkiq_types::Snapshot;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Successful mutation body: `{"success": true, "total", "occupied",
/// "available", "gate"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MutationResponse {
    /// Always `true` for this type.
    pub success: bool,
    /// Post-mutation snapshot, identical to what observers received.
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

impl From<Snapshot> for MutationResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            success: true,
            snapshot,
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/increment
// ---------------------------------------------------------------------------

/// Record a car entering.
///
/// Returns `400 {"success": false, "message": "Parking is full"}` at
/// capacity.
pub async fn increment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    let snapshot = state.facility.increment().await?;
    info!(occupied = snapshot.occupied, available = snapshot.available, "Car entered");
    Ok(Json(snapshot.into()))
}

// ---------------------------------------------------------------------------
// POST /api/decrement
// ---------------------------------------------------------------------------

/// Record a car leaving.
///
/// Returns `400 {"success": false, "message": "Parking is empty"}` at
/// zero.
pub async fn decrement(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    let snapshot = state.facility.decrement().await?;
    info!(occupied = snapshot.occupied, available = snapshot.available, "Car exited");
    Ok(Json(snapshot.into()))
}

// ---------------------------------------------------------------------------
// POST /api/gate/{open,close}
// ---------------------------------------------------------------------------

/// Raise the gate.
pub async fn open_gate(State(state): State<Arc<AppState>>) -> Json<MutationResponse> {
    let snapshot = state.facility.open_gate().await;
    info!(gate = %snapshot.gate, "Gate opened");
    Json(snapshot.into())
}

/// Lower the gate.
pub async fn close_gate(State(state): State<Arc<AppState>>) -> Json<MutationResponse> {
    let snapshot = state.facility.close_gate().await;
    info!(gate = %snapshot.gate, "Gate closed");
    Json(snapshot.into())
}
