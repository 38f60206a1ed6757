// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::QueueStore;
use serde::Serialize;

use super::open_context;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::sync::{CycleOutcome, NetworkMonitor, SyncEngine, SyncReport, Transport};

#[derive(Serialize)]
struct SyncOutput<'a> {
    #[serde(flatten)]
    report: &'a SyncReport,
    pending_count: usize,
    last_error: Option<String>,
}

pub async fn run(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    run_impl(&ctx.engine, output, &mut std::io::stdout()).await
}

/// Run one cycle and report it. Failed entries are reported, not raised.
pub(crate) async fn run_impl<S, T, N>(
    engine: &SyncEngine<S, T, N>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let report = engine.force_sync().await;
    let status = engine.status();

    if output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&SyncOutput {
            report: &report,
            pending_count: status.pending_count,
            last_error: status.last_error,
        })
        .map_err(|e| Error::Store(outbox_core::Error::Json(e)))?;
        writeln!(out, "{}", json)?;
        return Ok(());
    }

    match report.outcome {
        CycleOutcome::Offline => {
            writeln!(
                out,
                "Offline: {} operation(s) left queued",
                status.pending_count
            )?;
        }
        CycleOutcome::AlreadyRunning => {
            writeln!(out, "A sync is already in progress")?;
        }
        CycleOutcome::Completed => {
            writeln!(
                out,
                "Synced {}, failed {}, {} pending",
                report.success, report.failed, status.pending_count
            )?;
            for op in &report.evicted {
                writeln!(
                    out,
                    "Dropped {} ({} {}) after {} attempts",
                    op.id,
                    op.method,
                    op.endpoint,
                    op.retry_count + 1
                )?;
            }
            if let Some(err) = &status.last_error {
                writeln!(out, "Last error: {}", err)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
