// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed queue store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::QueueStore;
use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::id::generate_unique_id;
use crate::op::{NewOperation, PendingOperation};

/// SQL schema for the pending operation queue.
///
/// `seq` breaks ties between entries queued in the same instant.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pending_ops (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    endpoint TEXT NOT NULL,
    method TEXT NOT NULL,
    payload TEXT,
    retry_count INTEGER NOT NULL DEFAULT 0 CHECK (retry_count >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pending_ops_order ON pending_ops(created_at, seq);
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, kind, endpoint, method, payload, retry_count, created_at FROM pending_ops";

/// Queue store persisting operations in a SQLite database.
pub struct SqliteStore<C: ClockSource = SystemClock> {
    conn: Connection,
    clock: C,
}

impl SqliteStore<SystemClock> {
    /// Open or create a queue database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_clock(path, SystemClock)
    }

    /// Open an in-memory queue (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_clock(SystemClock)
    }
}

impl<C: ClockSource> SqliteStore<C> {
    /// Open or create a queue database with a custom clock source.
    pub fn open_with_clock(path: &Path, clock: C) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL for concurrent readers, FULL so a returned append is on disk
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore { conn, clock })
    }

    /// Open an in-memory queue with a custom clock source.
    pub fn open_in_memory_with_clock(clock: C) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn, clock })
    }

    fn id_exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM pending_ops WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

fn corrupted(column: &str, detail: impl std::fmt::Display) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(format!("column '{column}': {detail}"))),
    )
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_op(row: &Row<'_>) -> std::result::Result<PendingOperation, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let method: String = row.get(3)?;
    let payload: Option<String> = row.get(4)?;
    let retry_count: i64 = row.get(5)?;
    let created_at: String = row.get(6)?;

    let payload = payload
        .map(|text| serde_json::from_str(&text).map_err(|e| corrupted("payload", e)))
        .transpose()?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| corrupted("created_at", e))?
        .with_timezone(&Utc);

    Ok(PendingOperation {
        id: row.get(0)?,
        kind: parse_db(&kind, "kind")?,
        endpoint: row.get(2)?,
        method: parse_db(&method, "method")?,
        payload,
        retry_count: u32::try_from(retry_count).map_err(|e| corrupted("retry_count", e))?,
        created_at,
    })
}

impl<C: ClockSource> QueueStore for SqliteStore<C> {
    fn append(&mut self, op: NewOperation) -> Result<String> {
        let created_at = self.clock.now();
        let id = generate_unique_id(&op, &created_at, |candidate| {
            self.id_exists(candidate).unwrap_or(false)
        });

        let payload = op.payload.as_ref().map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO pending_ops (id, kind, endpoint, method, payload, retry_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                id,
                op.kind.as_str(),
                op.endpoint,
                op.method.as_str(),
                payload,
                format_timestamp(&created_at),
            ],
        )?;

        Ok(id)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM pending_ops WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn increment_retry(&mut self, id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE pending_ops SET retry_count = retry_count + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<PendingOperation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at, seq"))?;
        let ops = stmt
            .query_map([], row_to_op)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ops)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pending_ops", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| Error::CorruptedData(format!("row count: {e}")))
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM pending_ops", [])?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<PendingOperation>> {
        let op = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_op,
            )
            .optional()?;
        Ok(op)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
