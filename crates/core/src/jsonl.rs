// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) file utilities.
//!
//! Provides durable storage for JSON-serializable records, one record per
//! line. Appends are fsynced; full rewrites go through a temporary sibling
//! that is fsynced and renamed over the original, so a crash leaves either
//! the old or the new content on disk, never a mix.
//!
//! A final line without a trailing newline can only come from a write that
//! was interrupted mid-way. Readers ignore it and [`repair_torn_tail`]
//! truncates it so later appends start on a clean line.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Appends a record to a JSONL file with fsync for durability.
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let json = serde_json::to_string(record)?;
    writeln!(file, "{json}")?;
    file.sync_all()?;

    Ok(())
}

/// Reads all records from a JSONL file.
///
/// Skips empty lines and a torn final line, and returns an empty vec if the
/// file doesn't exist. Any other unparsable line is corrupted data.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match read_to_string(path)? {
        Some(content) => content,
        None => return Ok(Vec::new()),
    };

    let complete = complete_prefix(&content);
    let mut records = Vec::new();

    for (index, line) in complete.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line).map_err(|e| {
            Error::CorruptedData(format!("{} line {}: {}", path.display(), index + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Writes all records to a JSONL file, replacing existing content atomically.
pub fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp_path = tmp_path(path);
    {
        let mut file = File::create(&tmp_path)?;
        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(file, "{json}")?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    sync_parent_dir(path)?;

    Ok(())
}

/// Flushes the directory entry so a completed rename survives power loss.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

/// Truncates a torn final line left behind by an interrupted append.
///
/// Returns true if the file was modified.
pub fn repair_torn_tail(path: &Path) -> Result<bool> {
    let content = match read_to_string(path)? {
        Some(content) => content,
        None => return Ok(false),
    };

    let complete_len = complete_prefix(&content).len();
    if complete_len == content.len() {
        return Ok(false);
    }

    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(complete_len as u64)?;
    file.sync_all()?;
    Ok(true)
}

fn read_to_string(path: &Path) -> Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Everything up to and including the last newline.
fn complete_prefix(content: &str) -> &str {
    match content.rfind('\n') {
        Some(pos) => &content[..=pos],
        None => "",
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
