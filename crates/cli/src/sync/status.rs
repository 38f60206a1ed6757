// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync status snapshots and the listener registry that publishes them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Utc};
use outbox_core::PendingOperation;
use serde::Serialize;

/// Snapshot of the engine as seen by subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// True while a cycle is running.
    pub is_syncing: bool,
    /// Entries waiting in the queue.
    pub pending_count: usize,
    /// Completion time of the last cycle that reached the queue.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Most recent error message from the last completed cycle.
    pub last_error: Option<String>,
}

/// Why a cycle ended the way it did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The queue was walked.
    #[default]
    Completed,
    /// The network was unavailable; nothing was touched.
    Offline,
    /// Another cycle was already running.
    AlreadyRunning,
}

/// Result of one sync cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub outcome: CycleOutcome,
    /// Entries delivered and removed.
    pub success: usize,
    /// Failed deliveries, evictions included.
    pub failed: usize,
    /// Entries dropped after exhausting their retries.
    pub evicted: Vec<PendingOperation>,
}

impl SyncReport {
    /// An empty report for a cycle that never reached the queue.
    pub fn skipped(outcome: CycleOutcome) -> Self {
        SyncReport {
            outcome,
            ..SyncReport::default()
        }
    }
}

type Listener = Arc<dyn Fn(&SyncStatus) + Send + Sync>;

struct Registry {
    current: Mutex<SyncStatus>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

impl Registry {
    fn listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current(&self) -> MutexGuard<'_, SyncStatus> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn remove(&self, id: u64) {
        self.listeners().retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Holds the latest [`SyncStatus`] and fans every change out to listeners.
///
/// Listeners run synchronously on the publishing task, outside any internal
/// lock, so a listener may subscribe or unsubscribe from within its callback.
#[derive(Clone)]
pub struct StatusBroadcaster {
    registry: Arc<Registry>,
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new(SyncStatus::default())
    }
}

impl StatusBroadcaster {
    pub fn new(initial: SyncStatus) -> Self {
        StatusBroadcaster {
            registry: Arc::new(Registry {
                current: Mutex::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// The most recently published status.
    pub fn current(&self) -> SyncStatus {
        self.registry.current().clone()
    }

    /// Register a listener. It is called with the current status before
    /// this returns, then once per publish until the subscription ends.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SyncStatus) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        self.registry.listeners().push((id, Arc::clone(&listener)));

        let snapshot = self.current();
        listener(&snapshot);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Store `status` and deliver it to every listener.
    pub fn publish(&self, status: SyncStatus) {
        *self.registry.current() = status.clone();
        self.notify(&status);
    }

    /// Apply `change` to the current status and publish the result.
    ///
    /// The change runs under the status lock, so concurrent updates from
    /// different threads never overwrite each other.
    pub fn update(&self, change: impl FnOnce(&mut SyncStatus)) {
        let status = {
            let mut current = self.registry.current();
            change(&mut current);
            current.clone()
        };
        self.notify(&status);
    }

    fn notify(&self, status: &SyncStatus) {
        let listeners: Vec<Listener> = self
            .registry
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(status);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners().len()
    }
}

/// Handle returned by [`StatusBroadcaster::subscribe`].
///
/// Dropping the handle unsubscribes the listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
