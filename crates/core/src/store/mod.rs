// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for pending operations.
//!
//! [`QueueStore`] is the storage contract the sync engine relies on. Two
//! implementations ship with the crate:
//!
//! - [`JsonlStore`] - one JSON object per line, fsynced appends, atomic rewrites
//! - [`SqliteStore`] - a single `pending_ops` table in a WAL-mode database
//!
//! Both return entries in replay order (ascending `created_at`, ties in
//! insertion order) and re-read current state on every [`QueueStore::list`].

mod jsonl;
mod sqlite;

pub use jsonl::JsonlStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::op::{NewOperation, PendingOperation};

/// Durable, ordered storage for pending operations.
///
/// Single-writer access is assumed. Implementations must still tolerate an
/// append landing between a `list()` and the removals that follow it.
pub trait QueueStore: Send {
    /// Persists a new entry with a zero retry count and returns its id.
    ///
    /// The entry must survive a crash immediately after this returns.
    fn append(&mut self, op: NewOperation) -> Result<String>;

    /// Deletes an entry. Removing an unknown id is a no-op.
    fn remove(&mut self, id: &str) -> Result<()>;

    /// Increments the retry counter of an entry. Unknown ids are ignored.
    fn increment_retry(&mut self, id: &str) -> Result<()>;

    /// Returns all entries in replay (FIFO) order.
    fn list(&self) -> Result<Vec<PendingOperation>>;

    /// Returns the number of stored entries.
    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// Removes every entry.
    fn clear(&mut self) -> Result<()>;

    /// Looks up a single entry.
    fn get(&self, id: &str) -> Result<Option<PendingOperation>> {
        Ok(self.list()?.into_iter().find(|op| op.id == id))
    }
}

impl<S: QueueStore + ?Sized> QueueStore for Box<S> {
    fn append(&mut self, op: NewOperation) -> Result<String> {
        (**self).append(op)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        (**self).remove(id)
    }

    fn increment_retry(&mut self, id: &str) -> Result<()> {
        (**self).increment_retry(id)
    }

    fn list(&self) -> Result<Vec<PendingOperation>> {
        (**self).list()
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn get(&self, id: &str) -> Result<Option<PendingOperation>> {
        (**self).get(id)
    }
}
