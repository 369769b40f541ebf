//! Gate status and the derived facility snapshot.
//!
//! A [`Snapshot`] is never stored. It is recomputed from the facility
//! state every time it is broadcast or queried, so `available` can never
//! drift from `capacity - occupied`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// State of the facility's single entry gate.
///
/// The gate is operational state, not data-of-record: it always starts
/// [`GateStatus::Closed`] when the process starts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GateStatus {
    /// Barrier raised.
    Open,
    /// Barrier lowered.
    #[default]
    Closed,
}

impl GateStatus {
    /// Lowercase wire name (`"open"` / `"closed"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl core::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the facility pushed to observers and returned
/// by the mutation API.
///
/// Serialized as `{"total", "occupied", "available", "gate"}`. Only
/// built through [`Snapshot::new`]; it is never read back from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Fixed number of parking slots.
    #[serde(rename = "total")]
    pub capacity: u32,
    /// Slots currently taken.
    pub occupied: u32,
    /// Slots currently free (`capacity - occupied`).
    pub available: u32,
    /// Current gate state.
    pub gate: GateStatus,
}

impl Snapshot {
    /// Derive a snapshot from the authoritative fields.
    ///
    /// `available` saturates at zero; callers keep `occupied <= capacity`.
    pub const fn new(capacity: u32, occupied: u32, gate: GateStatus) -> Self {
        Self {
            capacity,
            occupied,
            available: capacity.saturating_sub(occupied),
            gate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn available_is_derived_from_capacity_and_occupied() {
        let snap = Snapshot::new(10, 3, GateStatus::Closed);
        assert_eq!(snap.available, 7);

        let full = Snapshot::new(5, 5, GateStatus::Open);
        assert_eq!(full.available, 0);
    }

    #[test]
    fn gate_defaults_to_closed() {
        assert_eq!(GateStatus::default(), GateStatus::Closed);
    }

    #[test]
    fn snapshot_wire_format() {
        let snap = Snapshot::new(10, 4, GateStatus::Open);
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 10,
                "occupied": 4,
                "available": 6,
                "gate": "open",
            })
        );
    }

    #[test]
    fn gate_parses_lowercase_names() {
        let gate: GateStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(gate, GateStatus::Closed);
        assert_eq!(GateStatus::Open.to_string(), "open");
    }
}
