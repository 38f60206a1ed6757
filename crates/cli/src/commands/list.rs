// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::{PendingOperation, QueueStore};

use super::open_context;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::sync::{NetworkMonitor, SyncEngine, Transport};

pub fn run(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    run_impl(&ctx.engine, output, &mut std::io::stdout())
}

pub(crate) fn run_impl<S, T, N>(
    engine: &SyncEngine<S, T, N>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let ops = engine.list_pending()?;
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ops)
                .map_err(|e| Error::Store(outbox_core::Error::Json(e)))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            if ops.is_empty() {
                writeln!(out, "No pending operations")?;
            }
            for op in &ops {
                writeln!(out, "{}", format_operation(op))?;
            }
        }
    }
    Ok(())
}

/// One line per entry: id, kind, method, endpoint, retries, queued time.
pub(crate) fn format_operation(op: &PendingOperation) -> String {
    let retries = match op.retry_count {
        0 => String::new(),
        1 => "  (1 retry)".to_string(),
        n => format!("  ({} retries)", n),
    };
    format!(
        "{}  {:<6}  {:<6}  {}  {}{}",
        op.id,
        op.kind.as_str(),
        op.method.as_str(),
        op.endpoint,
        op.created_at.format("%Y-%m-%d %H:%M:%S"),
        retries
    )
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
