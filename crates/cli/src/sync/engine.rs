// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The public sync engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use outbox_core::{Method, NewOperation, OperationKind, PendingOperation, QueueStore};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use super::executor::{Executor, DEFAULT_MAX_RETRIES};
use super::network::NetworkMonitor;
use super::scheduler::{Scheduler, DEFAULT_SYNC_INTERVAL};
use super::status::{StatusBroadcaster, Subscription, SyncReport, SyncStatus};
use super::transport::Transport;
use crate::error::{Error, Result};

/// Offline-first mutation queue with automatic replay.
///
/// Cloning is cheap and every clone drives the same queue.
///
/// ```text
/// queue_operation ──► store ◄── executor ──► transport
///                                  ▲
///             startup / timer / connectivity (scheduler)
/// ```
pub struct SyncEngine<S, T, N> {
    inner: Arc<Inner<S, T, N>>,
}

struct Inner<S, T, N> {
    executor: Arc<Executor<S, T, N>>,
    interval: Duration,
    scheduler: Mutex<Option<Scheduler>>,
    tracker: TaskTracker,
}

impl<S, T, N> Clone for SyncEngine<S, T, N> {
    fn clone(&self) -> Self {
        SyncEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Configures a [`SyncEngine`].
pub struct SyncEngineBuilder<S, T, N> {
    store: S,
    transport: T,
    network: N,
    max_retries: u32,
    interval: Duration,
}

impl<S, T, N> SyncEngineBuilder<S, T, N>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    /// Failed attempts allowed before an entry is dropped. An entry is
    /// evicted on attempt `max_retries + 1`.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Time between periodic cycles.
    pub fn sync_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn build(self) -> SyncEngine<S, T, N> {
        let executor = Executor::new(self.store, self.transport, self.network, self.max_retries);
        SyncEngine {
            inner: Arc::new(Inner {
                executor: Arc::new(executor),
                interval: self.interval,
                scheduler: Mutex::new(None),
                tracker: TaskTracker::new(),
            }),
        }
    }
}

impl<S, T, N> SyncEngine<S, T, N>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    pub fn builder(store: S, transport: T, network: N) -> SyncEngineBuilder<S, T, N> {
        SyncEngineBuilder {
            store,
            transport,
            network,
            max_retries: DEFAULT_MAX_RETRIES,
            interval: DEFAULT_SYNC_INTERVAL,
        }
    }

    /// Engine with default retry ceiling and interval.
    pub fn new(store: S, transport: T, network: N) -> Self {
        Self::builder(store, transport, network).build()
    }

    /// Start the scheduler. Runs a cycle right away, then on every interval
    /// and whenever connectivity comes back. Calling it again while running
    /// does nothing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<()> {
        let handle = Handle::try_current()
            .map_err(|_| Error::Runtime("start requires a tokio runtime".to_string()))?;
        let mut scheduler = self.scheduler();
        if scheduler.is_none() {
            self.inner.tracker.reopen();
            *scheduler = Some(Scheduler::spawn(
                Arc::clone(&self.inner.executor),
                self.inner.interval,
                &self.inner.tracker,
                &handle,
            ));
            tracing::debug!(interval = ?self.inner.interval, "sync scheduler started");
        }
        Ok(())
    }

    /// Stop scheduling cycles. A cycle in flight is not interrupted.
    pub fn stop(&self) {
        if let Some(scheduler) = self.scheduler().take() {
            scheduler.stop();
            tracing::debug!("sync scheduler stopped");
        }
    }

    /// Stop, then wait for the in-flight cycle and any opportunistic
    /// cycles to finish.
    pub async fn shutdown(&self) {
        self.stop();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
    }

    pub fn is_running(&self) -> bool {
        self.scheduler().is_some()
    }

    fn scheduler(&self) -> std::sync::MutexGuard<'_, Option<Scheduler>> {
        self.inner
            .scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Listen for status changes. The listener is called with the current
    /// status before this returns.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SyncStatus) + Send + Sync + 'static,
    {
        self.broadcaster().subscribe(listener)
    }

    pub fn status(&self) -> SyncStatus {
        self.broadcaster().current()
    }

    fn broadcaster(&self) -> &StatusBroadcaster {
        self.inner.executor.broadcaster()
    }

    /// Persist a mutation and return its id.
    ///
    /// When the network looks available, a cycle is started in the
    /// background; its outcome only shows up in the status.
    pub fn queue_operation(
        &self,
        kind: OperationKind,
        endpoint: impl Into<String>,
        method: Method,
        payload: Option<Value>,
    ) -> Result<String> {
        let mut op = NewOperation::new(kind, endpoint, method);
        if let Some(payload) = payload {
            op = op.with_payload(payload);
        }
        let id = self.inner.executor.append(op)?;

        if self.inner.executor.network().snapshot().is_online() {
            self.spawn_opportunistic_sync();
        }
        Ok(id)
    }

    fn spawn_opportunistic_sync(&self) {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!("no runtime, skipping opportunistic sync");
            return;
        };
        let executor = Arc::clone(&self.inner.executor);
        self.inner.tracker.spawn_on(
            async move {
                let report = executor.sync_all().await;
                tracing::debug!(
                    outcome = ?report.outcome,
                    success = report.success,
                    failed = report.failed,
                    "opportunistic sync finished"
                );
            },
            &handle,
        );
    }

    /// Run a cycle now. Returns an empty report if the network is down or
    /// a cycle is already running.
    pub async fn force_sync(&self) -> SyncReport {
        self.inner.executor.sync_all().await
    }

    pub fn pending_count(&self) -> Result<usize> {
        Ok(self.inner.executor.count()?)
    }

    /// Entries in replay order.
    pub fn list_pending(&self) -> Result<Vec<PendingOperation>> {
        Ok(self.inner.executor.list()?)
    }

    /// Drop every queued entry and publish the new status.
    pub fn clear_pending(&self) -> Result<()> {
        self.inner.executor.clear()?;
        Ok(())
    }
}
