// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod enqueue;
pub mod init;
pub mod list;
pub mod run;
pub mod status;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use outbox_core::QueueStore;

use crate::config::{find_work_dir, open_store, Config};
use crate::error::Result;
use crate::sync::{HttpTransport, ProbeNetwork, SyncEngine};

/// Engine as wired up by the command-line front end.
pub type CliEngine = SyncEngine<Box<dyn QueueStore>, HttpTransport, Arc<ProbeNetwork>>;

/// Everything a command needs, loaded from the nearest `.outbox/`.
pub struct Context {
    pub config: Config,
    pub work_dir: PathBuf,
    pub network: Arc<ProbeNetwork>,
    pub engine: CliEngine,
}

/// Helper to open the queue and build the engine from the current context.
pub fn open_context() -> Result<Context> {
    open_context_at(find_work_dir()?)
}

/// Build the context for a known `.outbox/` directory.
pub fn open_context_at(work_dir: PathBuf) -> Result<Context> {
    let config = Config::load(&work_dir)?;
    let store = open_store(&work_dir, &config)?;

    let mut transport = HttpTransport::new(&config.remote.url, config.request_timeout())?;
    if let Some(token) = config.token() {
        transport = transport.with_token(token);
    }
    let network = Arc::new(ProbeNetwork::for_url(
        &config.remote.url,
        config.probe_timeout(),
    )?);

    let engine = SyncEngine::builder(store, transport, Arc::clone(&network))
        .max_retries(config.sync.max_retries)
        .sync_interval(config.sync_interval())
        .build();

    Ok(Context {
        config,
        work_dir,
        network,
        engine,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
