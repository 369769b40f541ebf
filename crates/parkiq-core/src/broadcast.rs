//! Observer registry and best-effort snapshot fan-out.
//!
//! Every connected observer owns a small bounded queue. Publishing never
//! awaits observer I/O: each snapshot is handed to the queues with
//! `try_send`, and an observer whose queue is closed or full is removed
//! from the registry. Delivery to the remaining observers continues.
//!
//! There is no replay. An observer that reconnects receives the state at
//! reconnect time and nothing in between.

use std::collections::BTreeMap;

use parkiq_types::{ObserverId, Snapshot};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Per-observer queue depth.
///
/// An observer that falls this many snapshots behind is considered dead
/// and dropped.
pub const OBSERVER_QUEUE_CAPACITY: usize = 32;

/// Receiving end of one observer's feed.
///
/// The first message on `receiver` is the catch-up snapshot taken at
/// connect time. `receiver` yields `None` once the broadcaster has
/// dropped the observer.
#[derive(Debug)]
pub struct ObserverHandle {
    /// Registry key for this observer.
    pub id: ObserverId,
    /// Snapshots addressed to this observer, oldest first.
    pub receiver: mpsc::Receiver<Snapshot>,
}

/// Registry of live observers keyed by connection identity.
#[derive(Debug, Default)]
pub struct Broadcaster {
    observers: RwLock<BTreeMap<ObserverId, mpsc::Sender<Snapshot>>>,
}

impl Broadcaster {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer, queueing `current` as its catch-up
    /// snapshot before it becomes visible to [`Self::publish`].
    pub async fn connect(&self, current: Snapshot) -> ObserverHandle {
        let id = ObserverId::new();
        let (tx, receiver) = mpsc::channel(OBSERVER_QUEUE_CAPACITY);

        // The queue is empty, so the catch-up send cannot be refused.
        if tx.try_send(current).is_err() {
            debug!(observer = %id, "Catch-up snapshot rejected");
        }

        self.observers.write().await.insert(id, tx);
        debug!(observer = %id, "Observer registered");

        ObserverHandle { id, receiver }
    }

    /// Remove an observer. Unknown ids are ignored.
    pub async fn disconnect(&self, id: ObserverId) {
        if self.observers.write().await.remove(&id).is_some() {
            debug!(observer = %id, "Observer unregistered");
        }
    }

    /// Number of registered observers.
    pub async fn observer_count(&self) -> usize {
        self.observers.read().await.len()
    }

    /// Deliver `snapshot` to every registered observer.
    ///
    /// Returns the number of observers that accepted the snapshot.
    /// Observers that could not accept it are unregistered; this is never
    /// an error for the caller.
    pub async fn publish(&self, snapshot: &Snapshot) -> usize {
        let targets: Vec<(ObserverId, mpsc::Sender<Snapshot>)> = self
            .observers
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered: usize = 0;
        let mut dropped = Vec::new();

        for (id, tx) in targets {
            match tx.try_send(*snapshot) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(TrySendError::Full(_)) => {
                    debug!(observer = %id, "Observer queue full, dropping observer");
                    dropped.push(id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(observer = %id, "Observer gone, dropping observer");
                    dropped.push(id);
                }
            }
        }

        if !dropped.is_empty() {
            let mut observers = self.observers.write().await;
            for id in &dropped {
                observers.remove(id);
            }
        }

        delivered
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parkiq_types::GateStatus;

    use super::*;

    fn snap(occupied: u32) -> Snapshot {
        Snapshot::new(10, occupied, GateStatus::Closed)
    }

    #[tokio::test]
    async fn connect_queues_catch_up_snapshot_first() {
        let broadcaster = Broadcaster::new();
        let mut handle = broadcaster.connect(snap(4)).await;

        assert_eq!(handle.receiver.recv().await.unwrap(), snap(4));
        assert!(handle.receiver.try_recv().is_err());
        assert_eq!(broadcaster.observer_count().await, 1);
    }

    #[tokio::test]
    async fn publish_reaches_every_observer() {
        let broadcaster = Broadcaster::new();
        let mut a = broadcaster.connect(snap(0)).await;
        let mut b = broadcaster.connect(snap(0)).await;
        a.receiver.recv().await.unwrap();
        b.receiver.recv().await.unwrap();

        assert_eq!(broadcaster.publish(&snap(1)).await, 2);

        assert_eq!(a.receiver.recv().await.unwrap(), snap(1));
        assert_eq!(b.receiver.recv().await.unwrap(), snap(1));
    }

    #[tokio::test]
    async fn publish_with_no_observers_is_not_an_error() {
        let broadcaster = Broadcaster::new();
        assert_eq!(broadcaster.publish(&snap(1)).await, 0);
    }

    #[tokio::test]
    async fn closed_observer_is_pruned_without_affecting_others() {
        let broadcaster = Broadcaster::new();
        let gone = broadcaster.connect(snap(0)).await;
        let mut alive = broadcaster.connect(snap(0)).await;
        alive.receiver.recv().await.unwrap();
        drop(gone);

        assert_eq!(broadcaster.publish(&snap(2)).await, 1);
        assert_eq!(broadcaster.observer_count().await, 1);
        assert_eq!(alive.receiver.recv().await.unwrap(), snap(2));
    }

    #[tokio::test]
    async fn stalled_observer_is_dropped_when_queue_fills() {
        let broadcaster = Broadcaster::new();
        let mut stalled = broadcaster.connect(snap(0)).await;

        // The catch-up snapshot already occupies one slot.
        for n in 1..OBSERVER_QUEUE_CAPACITY {
            assert_eq!(broadcaster.publish(&snap(u32::try_from(n).unwrap())).await, 1);
        }
        assert_eq!(broadcaster.publish(&snap(9)).await, 0);
        assert_eq!(broadcaster.observer_count().await, 0);

        // Queued snapshots drain, then the feed ends.
        let mut received = 0;
        while stalled.receiver.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, OBSERVER_QUEUE_CAPACITY);
    }

    #[tokio::test]
    async fn disconnect_removes_observer() {
        let broadcaster = Broadcaster::new();
        let handle = broadcaster.connect(snap(0)).await;
        broadcaster.disconnect(handle.id).await;
        broadcaster.disconnect(handle.id).await;

        assert_eq!(broadcaster.observer_count().await, 0);
        assert_eq!(broadcaster.publish(&snap(1)).await, 0);
    }
}
