// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::{Method, OperationKind, QueueStore};
use serde_json::Value;

use super::open_context;
use crate::error::{Error, Result};
use crate::sync::{NetworkMonitor, SyncEngine, Transport};

pub async fn run(
    kind: String,
    method: String,
    endpoint: String,
    data: Option<String>,
    no_sync: bool,
) -> Result<()> {
    let (kind, method, payload) = parse_request(&kind, &method, data.as_deref())?;
    let ctx = open_context()?;
    if !no_sync {
        // A fresh probe decides whether the opportunistic cycle runs.
        ctx.network.refresh().await;
    }
    run_impl(
        &ctx.engine,
        kind,
        method,
        endpoint,
        payload,
        &mut std::io::stdout(),
    )
    .await
}

pub(crate) fn parse_request(
    kind: &str,
    method: &str,
    data: Option<&str>,
) -> Result<(OperationKind, Method, Option<Value>)> {
    let kind: OperationKind = kind.parse()?;
    let method: Method = method.parse()?;
    let payload = data
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| Error::InvalidPayload(e.to_string()))?;
    Ok((kind, method, payload))
}

/// Queue the operation, wait for any opportunistic cycle, print the id.
pub(crate) async fn run_impl<S, T, N>(
    engine: &SyncEngine<S, T, N>,
    kind: OperationKind,
    method: Method,
    endpoint: String,
    payload: Option<Value>,
    out: &mut impl Write,
) -> Result<()>
where
    S: QueueStore + 'static,
    T: Transport + 'static,
    N: NetworkMonitor + 'static,
{
    let id = engine.queue_operation(kind, endpoint, method, payload)?;
    engine.shutdown().await;
    writeln!(out, "{}", id)?;
    Ok(())
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
