// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::QueueStore;
use serde::Serialize;

use super::open_context;
use crate::cli::OutputFormat;
use crate::config::{queue_path, Backend};
use crate::error::{Error, Result};
use crate::sync::{NetworkMonitor, NetworkState, SyncEngine, Transport};

/// Where the queue lives and what it talks to.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Environment {
    pub remote: String,
    pub queue: String,
    pub backend: Backend,
    pub network: NetworkState,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    #[serde(flatten)]
    env: &'a Environment,
    pending_count: usize,
    is_syncing: bool,
}

pub async fn run(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    let network = ctx.network.refresh().await;
    let env = Environment {
        remote: ctx.config.remote.url.clone(),
        queue: queue_path(&ctx.work_dir, &ctx.config).display().to_string(),
        backend: ctx.config.queue.backend,
        network,
    };
    run_impl(&ctx.engine, &env, output, &mut std::io::stdout())
}

pub(crate) fn run_impl<S, T, N>(
    engine: &SyncEngine<S, T, N>,
    env: &Environment,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let report = StatusReport {
        env,
        pending_count: engine.pending_count()?,
        is_syncing: engine.status().is_syncing,
    };

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::Store(outbox_core::Error::Json(e)))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Remote:  {}", env.remote)?;
            writeln!(out, "Network: {}", env.network)?;
            writeln!(out, "Queue:   {} ({})", env.queue, env.backend)?;
            writeln!(out, "Pending: {}", report.pending_count)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
