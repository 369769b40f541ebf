//! The single authoritative occupancy and gate state.
//!
//! [`FacilityState`] is the pure state machine: bounds checks and gate
//! changes, no I/O. [`Facility`] owns one `FacilityState` behind a mutex
//! together with the durable store and the observer registry, and is the
//! only mutation entry point the rest of the service sees.
//!
//! # Ordering
//!
//! Each `Facility` mutation holds the state lock across
//! update -> persist -> publish. The snapshot returned to the caller is
//! the same value every observer received, and no other mutation can be
//! observed in between. The store write runs on the blocking pool and is
//! awaited under the lock, so async workers stay free without reordering
//! writes.

use std::sync::Arc;

use parkiq_types::{GateStatus, Snapshot};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::broadcast::{Broadcaster, ObserverHandle};
use crate::store::OccupancyStore;

/// Rejected facility operations.
///
/// The `Display` text is user-facing and is returned verbatim by the
/// mutation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FacilityError {
    /// Increment attempted with every slot taken.
    #[error("Parking is full")]
    CapacityExceeded {
        /// The configured capacity.
        capacity: u32,
    },

    /// Decrement attempted with no slot taken.
    #[error("Parking is empty")]
    Underflow,

    /// A facility cannot be built with zero capacity.
    #[error("capacity must be greater than zero")]
    InvalidCapacity,

    /// The initial count is larger than the capacity.
    #[error("occupied count {occupied} exceeds capacity {capacity}")]
    OccupancyOutOfRange {
        /// Requested initial count.
        occupied: u32,
        /// The configured capacity.
        capacity: u32,
    },
}

/// Capacity, occupied count, and gate status.
///
/// Invariant: `occupied <= capacity` and `capacity > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityState {
    capacity: u32,
    occupied: u32,
    gate: GateStatus,
}

impl FacilityState {
    /// Build a state with the gate closed.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::InvalidCapacity`] for zero capacity and
    /// [`FacilityError::OccupancyOutOfRange`] if `occupied > capacity`.
    pub const fn new(capacity: u32, occupied: u32) -> Result<Self, FacilityError> {
        if capacity == 0 {
            return Err(FacilityError::InvalidCapacity);
        }
        if occupied > capacity {
            return Err(FacilityError::OccupancyOutOfRange { occupied, capacity });
        }
        Ok(Self {
            capacity,
            occupied,
            gate: GateStatus::Closed,
        })
    }

    /// Configured number of slots.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Slots currently taken.
    pub const fn occupied(&self) -> u32 {
        self.occupied
    }

    /// Current gate status.
    pub const fn gate(&self) -> GateStatus {
        self.gate
    }

    /// Derive the current snapshot.
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.capacity, self.occupied, self.gate)
    }

    /// Record one car entering.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::CapacityExceeded`] when full; the state is
    /// unchanged.
    pub fn increment(&mut self) -> Result<Snapshot, FacilityError> {
        if self.occupied >= self.capacity {
            return Err(FacilityError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.occupied = self.occupied.saturating_add(1);
        Ok(self.snapshot())
    }

    /// Record one car leaving.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::Underflow`] when empty; the state is
    /// unchanged.
    pub fn decrement(&mut self) -> Result<Snapshot, FacilityError> {
        self.occupied = self
            .occupied
            .checked_sub(1)
            .ok_or(FacilityError::Underflow)?;
        Ok(self.snapshot())
    }

    /// Set the gate. Always succeeds, including when already in `gate`.
    pub const fn set_gate(&mut self, gate: GateStatus) -> Snapshot {
        self.gate = gate;
        self.snapshot()
    }
}

/// Process-wide facility: state, durable store, and observer registry.
///
/// Constructed once at startup and shared via `Arc`.
pub struct Facility {
    state: Mutex<FacilityState>,
    store: Arc<dyn OccupancyStore>,
    broadcaster: Broadcaster,
}

impl core::fmt::Debug for Facility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Facility")
            .field("state", &self.state)
            .field("broadcaster", &self.broadcaster)
            .finish_non_exhaustive()
    }
}

impl Facility {
    /// Open the facility, loading the occupied count from `store`.
    ///
    /// The gate always starts closed. A stored count above `capacity`
    /// (capacity lowered between runs) is clamped and written back.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::InvalidCapacity`] for zero capacity.
    pub fn open(capacity: u32, store: Box<dyn OccupancyStore>) -> Result<Self, FacilityError> {
        if capacity == 0 {
            return Err(FacilityError::InvalidCapacity);
        }

        let loaded = store.load();
        let occupied = if loaded > capacity {
            warn!(loaded, capacity, "Stored occupancy exceeds capacity, clamping");
            if let Err(e) = store.save(capacity) {
                error!(error = %e, "Failed to persist clamped occupancy");
            }
            capacity
        } else {
            loaded
        };

        let state = FacilityState::new(capacity, occupied)?;
        info!(capacity, occupied, gate = %state.gate(), "Facility opened");

        Ok(Self {
            state: Mutex::new(state),
            store: Arc::from(store),
            broadcaster: Broadcaster::new(),
        })
    }

    /// Current snapshot. Pure read.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }

    /// Record one car entering, persist, and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::CapacityExceeded`] when full. Nothing is
    /// persisted or broadcast in that case.
    pub async fn increment(&self) -> Result<Snapshot, FacilityError> {
        let mut state = self.state.lock().await;
        let snapshot = state.increment()?;
        self.persist(snapshot.occupied).await;
        self.broadcaster.publish(&snapshot).await;
        Ok(snapshot)
    }

    /// Record one car leaving, persist, and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::Underflow`] when empty. Nothing is
    /// persisted or broadcast in that case.
    pub async fn decrement(&self) -> Result<Snapshot, FacilityError> {
        let mut state = self.state.lock().await;
        let snapshot = state.decrement()?;
        self.persist(snapshot.occupied).await;
        self.broadcaster.publish(&snapshot).await;
        Ok(snapshot)
    }

    /// Open the gate and broadcast. Not persisted.
    pub async fn open_gate(&self) -> Snapshot {
        self.set_gate(GateStatus::Open).await
    }

    /// Close the gate and broadcast. Not persisted.
    pub async fn close_gate(&self) -> Snapshot {
        self.set_gate(GateStatus::Closed).await
    }

    async fn set_gate(&self, gate: GateStatus) -> Snapshot {
        let mut state = self.state.lock().await;
        let snapshot = state.set_gate(gate);
        self.broadcaster.publish(&snapshot).await;
        snapshot
    }

    /// Register a new observer.
    ///
    /// The current snapshot is queued as the observer's first message
    /// while the state lock is held, so it always precedes the broadcast
    /// of any later mutation.
    pub async fn connect(&self) -> ObserverHandle {
        let state = self.state.lock().await;
        self.broadcaster.connect(state.snapshot()).await
    }

    /// Unregister an observer.
    pub async fn disconnect(&self, id: parkiq_types::ObserverId) {
        self.broadcaster.disconnect(id).await;
    }

    /// Number of connected observers.
    pub async fn observer_count(&self) -> usize {
        self.broadcaster.observer_count().await
    }

    // Durability is best-effort: a failed write is logged and the
    // in-memory count stays authoritative for the rest of the process.
    async fn persist(&self, occupied: u32) {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || store.save(occupied)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(occupied, error = %e, "Failed to persist occupancy, keeping in-memory state");
            }
            Err(e) => {
                error!(occupied, error = %e, "Occupancy write task failed, keeping in-memory state");
            }
        }
    }
}
