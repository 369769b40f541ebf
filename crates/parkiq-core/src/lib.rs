//! Facility state, occupancy persistence, and snapshot fan-out for ParkIQ.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `parkiq-config.yaml`
//! - [`store`] -- Durable occupancy record (whole-file JSON replace)
//! - [`broadcast`] -- Observer registry and best-effort snapshot fan-out
//! - [`facility`] -- The single authoritative occupancy and gate state
//!
//! # Architecture
//!
//! [`Facility`] is constructed once at startup and shared by reference.
//! Every mutation runs behind one lock: the state is updated, the new
//! count is written through to the [`OccupancyStore`], and the fresh
//! [`Snapshot`](parkiq_types::Snapshot) is published to every observer
//! before the lock is released. No two mutations can interleave between
//! state update and broadcast.

pub mod broadcast;
pub mod config;
pub mod facility;
pub mod store;

pub use broadcast::{Broadcaster, ObserverHandle};
pub use config::{ConfigError, ParkIqConfig};
pub use facility::{Facility, FacilityError, FacilityState};
pub use store::{JsonFileStore, OccupancyStore, StoreError};
