// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One sync cycle: walk the queue in FIFO order and replay each entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use outbox_core::{NewOperation, PendingOperation, QueueStore};

use super::network::NetworkMonitor;
use super::status::{CycleOutcome, StatusBroadcaster, SyncReport, SyncStatus};
use super::transport::Transport;

/// Failed attempts tolerated before an entry is evicted.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Owns the store and the collaborators, and runs at most one cycle at a
/// time.
///
/// The store mutex is only held for individual store calls, never across
/// a transport call, so appends land while a cycle is in flight.
pub(crate) struct Executor<S, T, N> {
    store: Mutex<S>,
    transport: T,
    network: N,
    broadcaster: StatusBroadcaster,
    syncing: AtomicBool,
    max_retries: u32,
}

/// Clears the syncing flag when the cycle ends, even if its future is
/// dropped part way.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S, T, N> Executor<S, T, N>
where
    S: QueueStore,
    T: Transport,
    N: NetworkMonitor,
{
    pub fn new(store: S, transport: T, network: N, max_retries: u32) -> Self {
        let pending_count = store.count().unwrap_or_else(|e| {
            tracing::error!("failed to count pending operations: {e}");
            0
        });
        Executor {
            store: Mutex::new(store),
            transport,
            network,
            broadcaster: StatusBroadcaster::new(SyncStatus {
                pending_count,
                ..SyncStatus::default()
            }),
            syncing: AtomicBool::new(false),
            max_retries,
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn broadcaster(&self) -> &StatusBroadcaster {
        &self.broadcaster
    }

    #[cfg(test)]
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut store)
    }

    /// Pending count for a status refresh; falls back to the last published
    /// value when the store cannot be read.
    fn refreshed_count(&self) -> usize {
        match self.with_store(|s| s.count()) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("failed to count pending operations: {e}");
                self.broadcaster.current().pending_count
            }
        }
    }

    pub fn append(&self, op: NewOperation) -> outbox_core::Result<String> {
        let id = self.with_store(|s| s.append(op))?;
        tracing::debug!(%id, "queued operation");
        let pending = self.refreshed_count();
        self.broadcaster.update(|s| s.pending_count = pending);
        Ok(id)
    }

    pub fn count(&self) -> outbox_core::Result<usize> {
        self.with_store(|s| s.count())
    }

    pub fn list(&self) -> outbox_core::Result<Vec<PendingOperation>> {
        self.with_store(|s| s.list())
    }

    pub fn clear(&self) -> outbox_core::Result<()> {
        self.with_store(|s| s.clear())?;
        let pending = self.refreshed_count();
        self.broadcaster.update(|s| s.pending_count = pending);
        Ok(())
    }

    /// Run one cycle. Never fails: problems are reported through the
    /// returned report and the published status.
    pub async fn sync_all(&self) -> SyncReport {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync already in progress, skipping");
            return SyncReport::skipped(CycleOutcome::AlreadyRunning);
        }
        let _guard = CycleGuard(&self.syncing);
        self.broadcaster.update(|s| s.is_syncing = true);

        let state = self.network.current_state().await;
        if !state.is_online() {
            tracing::debug!(%state, "network unavailable, skipping sync");
            let pending = self.refreshed_count();
            self.broadcaster.update(|s| {
                s.is_syncing = false;
                s.pending_count = pending;
            });
            return SyncReport::skipped(CycleOutcome::Offline);
        }

        let mut report = SyncReport::default();
        let mut last_error = None;
        match self.list() {
            Ok(ops) => {
                tracing::debug!(pending = ops.len(), "sync cycle started");
                for op in ops {
                    self.replay(op, &mut report, &mut last_error).await;
                }
            }
            Err(e) => {
                tracing::error!("failed to read queue: {e}");
                last_error = Some(format!("failed to read queue: {e}"));
            }
        }

        let pending = self.refreshed_count();
        self.broadcaster.update(|s| {
            s.is_syncing = false;
            s.pending_count = pending;
            s.last_sync_at = Some(Utc::now());
            s.last_error = last_error;
        });
        tracing::debug!(
            success = report.success,
            failed = report.failed,
            evicted = report.evicted.len(),
            pending,
            "sync cycle finished"
        );
        report
    }

    async fn replay(
        &self,
        op: PendingOperation,
        report: &mut SyncReport,
        last_error: &mut Option<String>,
    ) {
        let result = self
            .transport
            .call(&op.endpoint, op.method, op.payload.as_ref())
            .await;

        match result {
            Ok(_) => {
                report.success += 1;
                if let Err(e) = self.with_store(|s| s.remove(&op.id)) {
                    tracing::error!(id = %op.id, "failed to remove delivered operation: {e}");
                    *last_error = Some(format!("failed to remove {}: {e}", op.id));
                }
            }
            Err(e) => {
                report.failed += 1;
                *last_error = Some(e.to_string());

                if op.retry_count >= self.max_retries {
                    tracing::warn!(
                        id = %op.id,
                        method = %op.method,
                        endpoint = %op.endpoint,
                        attempts = op.retry_count + 1,
                        "dropping operation after repeated failures: {e}"
                    );
                    match self.with_store(|s| s.remove(&op.id)) {
                        Ok(()) => report.evicted.push(op),
                        Err(store_err) => {
                            tracing::error!(id = %op.id, "failed to evict operation: {store_err}");
                            *last_error = Some(format!("failed to evict {}: {store_err}", op.id));
                        }
                    }
                } else {
                    tracing::debug!(id = %op.id, retry = op.retry_count + 1, "delivery failed: {e}");
                    if let Err(store_err) = self.with_store(|s| s.increment_retry(&op.id)) {
                        tracing::error!(id = %op.id, "failed to record retry: {store_err}");
                        *last_error = Some(format!("failed to record retry for {}: {store_err}", op.id));
                    }
                }
            }
        }
    }
}
