//! HTTP mutation API and `WebSocket` observer feed for ParkIQ.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Mutation endpoints** (`POST /api/increment`, `/api/decrement`,
//!   `/api/gate/open`, `/api/gate/close`) that drive the shared
//!   [`Facility`](parkiq_core::Facility)
//! - **`WebSocket` endpoint** (`/ws`) that pushes a snapshot on connect
//!   and after every state change
//! - **Read endpoints** (`GET /api/status`, `GET /api/health`)
//! - **Minimal HTML dashboard** (`GET /`) showing live occupancy
//!
//! # Architecture
//!
//! Handlers hold no state of their own. Every request goes through the
//! single [`Facility`](parkiq_core::Facility) in [`AppState`], which
//! serializes mutations and fans snapshots out to observers. A slow
//! `WebSocket` client only ever delays its own connection task.

pub mod error;
pub mod handlers;
pub mod mutation;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::AppState;
