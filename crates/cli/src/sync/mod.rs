// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync engine.
//!
//! Mutations are persisted to a [`QueueStore`](outbox_core::QueueStore)
//! first and replayed against the remote when the network allows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Engine    │────►│  Executor   │────►│  Transport  │────► Remote
//! │(SyncEngine) │     │ (one cycle) │     │   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │    ▲
//!        ▼                   ▼    │
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Scheduler  │     │    Queue    │     │   Network   │
//! │(timer/watch)│     │(QueueStore) │     │  (monitor)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO replay, one entry at a time
//! - At most one cycle at a time; extra requests return an empty report
//! - Entries are dropped after a fixed number of failed attempts
//! - Status snapshots pushed to subscribers
//! - Injectable transport and network traits for testing

mod engine;
mod executor;
mod network;
mod scheduler;
mod status;
mod transport;

pub use engine::{SyncEngine, SyncEngineBuilder};
pub use executor::DEFAULT_MAX_RETRIES;
pub use network::{ManualNetwork, NetworkMonitor, NetworkState, ProbeNetwork};
pub use scheduler::DEFAULT_SYNC_INTERVAL;
pub use status::{CycleOutcome, StatusBroadcaster, Subscription, SyncReport, SyncStatus};
pub use transport::{HttpTransport, Transport, TransportError, TransportResult};

#[cfg(test)]
pub(crate) mod test_helpers;
