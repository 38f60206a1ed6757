// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL-backed queue store.
//!
//! Each pending operation is one line. Appends are fsynced immediately.
//! Removals and retry bumps rewrite the whole file through an atomic rename.
//! Mutations hold an advisory lock on a `<file>.lock` sidecar so separate
//! processes sharing the queue (a long-running `outbox run` and a one-shot
//! `outbox enqueue`) cannot interleave rewrites.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::QueueStore;
use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::id::generate_unique_id;
use crate::jsonl;
use crate::op::{sort_fifo, NewOperation, PendingOperation};

/// Queue store persisting operations in a JSONL file.
pub struct JsonlStore<C: ClockSource = SystemClock> {
    /// Path to the queue file.
    path: PathBuf,
    /// Path to the lock sidecar.
    lock_path: PathBuf,
    clock: C,
}

/// Holds the advisory lock until dropped (closing the file releases it).
struct LockGuard {
    _file: File,
}

impl JsonlStore<SystemClock> {
    /// Create or open a queue at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: ClockSource> JsonlStore<C> {
    /// Create or open a queue with a custom clock source.
    ///
    /// A torn final line from an interrupted append is truncated here.
    pub fn with_clock(path: &Path, clock: C) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut lock_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        lock_name.push(".lock");

        let store = JsonlStore {
            path: path.to_path_buf(),
            lock_path: path.with_file_name(lock_name),
            clock,
        };

        let _guard = store.lock()?;
        OpenOptions::new().create(true).append(true).open(&store.path)?;
        jsonl::repair_torn_tail(&store.path)?;

        Ok(store)
    }

    /// Returns the path to the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        file.lock_exclusive()
            .map_err(|e| Error::Lock(format!("{}: {}", self.lock_path.display(), e)))?;
        Ok(LockGuard { _file: file })
    }

    /// Take the lock for a mutation. Another writer may have died
    /// mid-append since the last call, so its torn tail is dropped first.
    fn lock_for_write(&self) -> Result<LockGuard> {
        let guard = self.lock()?;
        jsonl::repair_torn_tail(&self.path)?;
        Ok(guard)
    }

    fn read(&self) -> Result<Vec<PendingOperation>> {
        jsonl::read_all(&self.path)
    }
}

impl<C: ClockSource> QueueStore for JsonlStore<C> {
    fn append(&mut self, op: NewOperation) -> Result<String> {
        let _guard = self.lock_for_write()?;

        let existing = self.read()?;
        let created_at = self.clock.now();
        let id = generate_unique_id(&op, &created_at, |candidate| {
            existing.iter().any(|e| e.id == candidate)
        });

        let entry = PendingOperation::from_new(id.clone(), op, created_at);
        jsonl::append(&self.path, &entry)?;

        Ok(id)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        let _guard = self.lock_for_write()?;

        let mut ops = self.read()?;
        let before = ops.len();
        ops.retain(|op| op.id != id);
        if ops.len() == before {
            return Ok(());
        }

        jsonl::write_all(&self.path, &ops)
    }

    fn increment_retry(&mut self, id: &str) -> Result<()> {
        let _guard = self.lock_for_write()?;

        let mut ops = self.read()?;
        let Some(entry) = ops.iter_mut().find(|op| op.id == id) else {
            return Ok(());
        };
        entry.retry_count = entry.retry_count.saturating_add(1);

        jsonl::write_all(&self.path, &ops)
    }

    fn list(&self) -> Result<Vec<PendingOperation>> {
        let mut ops = self.read()?;
        sort_fifo(&mut ops);
        Ok(ops)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn clear(&mut self) -> Result<()> {
        let _guard = self.lock_for_write()?;
        jsonl::write_all::<PendingOperation>(&self.path, &[])
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
