//! Shared type definitions for the ParkIQ occupancy service.
//!
//! Types defined here are shared by the core state machine and the
//! observer server, and flow downstream to `TypeScript` via `ts-rs` for
//! the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for observer connection identity
//! - [`snapshot`] -- Gate status and the broadcastable facility snapshot

pub mod ids;
pub mod snapshot;

pub use ids::ObserverId;
pub use snapshot::{GateStatus, Snapshot};
