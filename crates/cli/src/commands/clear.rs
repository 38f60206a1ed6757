// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::QueueStore;

use super::open_context;
use crate::error::Result;
use crate::sync::{NetworkMonitor, SyncEngine, Transport};

pub fn run() -> Result<()> {
    let ctx = open_context()?;
    run_impl(&ctx.engine, &mut std::io::stdout())
}

pub(crate) fn run_impl<S, T, N>(engine: &SyncEngine<S, T, N>, out: &mut impl Write) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let count = engine.pending_count()?;
    engine.clear_pending()?;
    writeln!(out, "Cleared {} pending operation(s)", count)?;
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
