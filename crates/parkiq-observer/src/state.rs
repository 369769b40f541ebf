//! Shared application state for the ParkIQ server.

use std::sync::Arc;

use parkiq_core::Facility;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// facility is the only owner of occupancy and gate state; handlers
/// never cache it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide facility.
    pub facility: Arc<Facility>,
}

impl AppState {
    /// Wrap an opened facility.
    pub fn new(facility: Facility) -> Self {
        Self {
            facility: Arc::new(facility),
        }
    }
}
