// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outboxrs - an offline-first mutation queue with automatic replay.
//!
//! This crate provides the sync engine and the `outbox` CLI built on it.
//! Mutations are persisted to a durable queue (see [`outbox_core`]) and
//! replayed in order against a remote HTTP API whenever it can be reached.
//!
//! # Main Components
//!
//! - [`sync::SyncEngine`] - queue, scheduler, executor and status in one handle
//! - [`sync::Transport`] / [`sync::HttpTransport`] - how operations reach the remote
//! - [`sync::NetworkMonitor`] - connectivity source ([`sync::ManualNetwork`], [`sync::ProbeNetwork`])
//! - [`Config`] - project configuration in `.outbox/config.toml`
//! - [`Error`] - error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use outbox_core::{Method, OperationKind, SqliteStore};
//! use outboxrs::sync::{HttpTransport, ManualNetwork, SyncEngine};
//!
//! let network = Arc::new(ManualNetwork::online());
//! let engine = SyncEngine::new(
//!     SqliteStore::open(Path::new("queue.db"))?,
//!     HttpTransport::new("https://api.example.com", Duration::from_secs(30))?,
//!     Arc::clone(&network),
//! );
//! let _sub = engine.subscribe(|status| println!("{} pending", status.pending_count));
//! engine.start()?;
//! engine.queue_operation(OperationKind::Create, "/posts", Method::Post, Some(body))?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, init_work_dir, open_store, queue_path, Backend, Config};
pub use error::{Error, Result};

/// Execute a parsed command line. This is the main entry point for the
/// binary and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }

    let default_level = match cli.command {
        Command::Run => "info",
        _ => "warn",
    };
    logging::setup_logging(default_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;
    runtime.block_on(execute(cli.command))
}

async fn execute(command: Command) -> Result<()> {
    match command {
        Command::Init { url, backend, path } => commands::init::run(url, backend, path),
        Command::Enqueue {
            kind,
            method,
            endpoint,
            data,
            no_sync,
        } => commands::enqueue::run(kind, method, endpoint, data, no_sync).await,
        Command::List { output } => commands::list::run(output),
        Command::Status { output } => commands::status::run(output).await,
        Command::Sync { output } => commands::sync::run(output).await,
        Command::Clear => commands::clear::run(),
        Command::Run => commands::run::run().await,
    }
}
