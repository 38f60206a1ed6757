// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: durable queue of pending remote mutations
//!
//! This crate provides the data model, id generation and the storage
//! contract ([`QueueStore`]) used by the outbox sync engine, together with
//! JSONL and SQLite implementations of it.

pub mod clock;
pub mod error;
pub mod id;
pub mod jsonl;
pub mod op;
pub mod store;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use op::{Method, NewOperation, OperationKind, PendingOperation};
pub use store::{JsonlStore, QueueStore, SqliteStore};
