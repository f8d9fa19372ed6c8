//! One reader/writer gate in front of the whole record store.

use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::store::RecordStore;

/// Serializes access to a [`RecordStore`].
///
/// Reads share the gate, and add/change/delete hold it alone. Every hold
/// also spends the configured latency before the guard is handed out, so
/// the simulated work is covered by the same hold as the real operation.
/// The lock is not reentrant and there is no upgrade from shared to
/// exclusive.
pub struct AccessCoordinator<S> {
    store: RwLock<RecordStore<S>>,
    latency: Duration,
}

impl<S> AccessCoordinator<S> {
    pub fn new(store: RecordStore<S>, latency: Duration) -> Self {
        Self {
            store: RwLock::new(store),
            latency,
        }
    }

    /// Waits for a shared hold.
    pub async fn shared(&self) -> RwLockReadGuard<'_, RecordStore<S>> {
        let guard = self.store.read().await;
        debug!("shared hold acquired");
        self.simulate_work().await;
        guard
    }

    /// Waits for an exclusive hold.
    pub async fn exclusive(&self) -> RwLockWriteGuard<'_, RecordStore<S>> {
        let guard = self.store.write().await;
        debug!("exclusive hold acquired");
        self.simulate_work().await;
        guard
    }

    async fn simulate_work(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
