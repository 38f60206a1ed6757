// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle triggers: startup, a periodic timer and connectivity restoration.

use std::sync::Arc;
use std::time::Duration;

use outbox_core::QueueStore;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::executor::Executor;
use super::network::{NetworkMonitor, NetworkState};
use super::status::{CycleOutcome, SyncReport};
use super::transport::Transport;

/// Default time between periodic cycles.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// A running trigger loop. Dropping it does not stop the loop; call
/// [`Scheduler::stop`].
pub(crate) struct Scheduler {
    cancel: CancellationToken,
}

impl Scheduler {
    /// Spawn the trigger loop on `handle`, tracked by `tracker`.
    ///
    /// The first timer tick fires immediately and serves as the startup
    /// cycle.
    pub fn spawn<S, T, N>(
        executor: Arc<Executor<S, T, N>>,
        interval: Duration,
        tracker: &TaskTracker,
        handle: &Handle,
    ) -> Self
    where
        S: QueueStore + 'static,
        T: Transport + 'static,
        N: NetworkMonitor + 'static,
    {
        let cancel = CancellationToken::new();
        let mut network = executor.network().subscribe();
        // Only transitions after start count as "restored".
        network.borrow_and_update();

        let token = cancel.clone();
        tracker.spawn_on(
            async move { run(executor, interval, network, token).await },
            handle,
        );
        Scheduler { cancel }
    }

    /// Prevent future cycles. A cycle already running finishes normally.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

async fn run<S, T, N>(
    executor: Arc<Executor<S, T, N>>,
    interval: Duration,
    mut network: watch::Receiver<NetworkState>,
    cancel: CancellationToken,
) where
    S: QueueStore,
    T: Transport,
    N: NetworkMonitor,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watching = true;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let report = executor.sync_all().await;
                acknowledge(&mut network, &report);
            }
            changed = network.changed(), if watching => {
                if changed.is_err() {
                    tracing::debug!("network monitor closed");
                    watching = false;
                    continue;
                }
                let state = *network.borrow_and_update();
                if state.is_online() {
                    tracing::info!("connectivity restored, syncing");
                    let report = executor.sync_all().await;
                    acknowledge(&mut network, &report);
                }
            }
        }
    }
    tracing::debug!("scheduler stopped");
}

/// A monitor may publish from inside the cycle's own connectivity check.
/// Once a cycle has run against an online network, transitions seen during
/// it are not a new reason to sync. After an offline cycle they are.
fn acknowledge(network: &mut watch::Receiver<NetworkState>, report: &SyncReport) {
    if report.outcome != CycleOutcome::Offline {
        network.borrow_and_update();
    }
}
