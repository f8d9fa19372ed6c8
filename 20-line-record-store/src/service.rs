use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::{
    coordinator::AccessCoordinator,
    store::{FileStorage, RecordStore},
};

/// Shared state every session works against: the gated record store plus
/// the connection counter used to label sessions in logs.
///
/// Built once at startup and handed to each session behind an `Arc`.
pub struct StoreService<S = FileStorage> {
    coordinator: AccessCoordinator<S>,
    connections: AtomicU64,
}

impl<S> StoreService<S> {
    pub fn new(store: RecordStore<S>, latency: Duration) -> Self {
        Self {
            coordinator: AccessCoordinator::new(store, latency),
            connections: AtomicU64::new(0),
        }
    }

    pub fn coordinator(&self) -> &AccessCoordinator<S> {
        &self.coordinator
    }

    /// Counts one more accepted connection and returns its 1-based ordinal.
    pub fn next_session(&self) -> u64 {
        self.connections.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }
}
