// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground sync loop for `outbox run`.

use std::future::Future;

use outbox_core::QueueStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::open_context;
use crate::error::Result;
use crate::sync::{NetworkMonitor, SyncEngine, SyncStatus, Transport};

pub async fn run() -> Result<()> {
    let ctx = open_context()?;
    let cancel = CancellationToken::new();
    let probe = ctx
        .network
        .spawn_probe_loop(ctx.config.probe_interval(), cancel.clone());

    tracing::info!(
        remote = %ctx.config.remote.url,
        interval_secs = ctx.config.sync.interval_secs,
        "outbox running, press Ctrl-C to stop"
    );
    let result = run_until(&ctx.engine, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
        }
    })
    .await;

    cancel.cancel();
    join_probe(probe).await;
    result
}

/// Wait for the probe loop to exit, logging it if the task died.
pub(crate) async fn join_probe(probe: JoinHandle<()>) {
    if let Err(e) = probe.await {
        tracing::error!("network probe task failed: {e}");
    }
}

/// Start the engine, log status changes until `shutdown` resolves, then
/// wait for the in-flight cycle.
pub(crate) async fn run_until<S, T, N>(
    engine: &SyncEngine<S, T, N>,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let _subscription = engine.subscribe(log_status);
    engine.start()?;
    shutdown.await;
    tracing::info!("stopping");
    engine.shutdown().await;
    Ok(())
}

fn log_status(status: &SyncStatus) {
    if status.is_syncing {
        tracing::debug!(pending = status.pending_count, "sync started");
        return;
    }
    match &status.last_error {
        Some(err) => tracing::warn!(pending = status.pending_count, "last sync had errors: {err}"),
        None => tracing::info!(pending = status.pending_count, "idle"),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
