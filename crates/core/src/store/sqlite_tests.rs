// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::op::{Method, OperationKind};
use serde_json::json;
use tempfile::TempDir;

fn post(endpoint: &str) -> NewOperation {
    NewOperation::new(OperationKind::Create, endpoint, Method::Post)
}

#[test]
fn open_creates_schema_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("queue.db");

    let store = SqliteStore::open(&path).unwrap();

    assert!(path.exists());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queue.db");

    let id = {
        let mut store = SqliteStore::open(&path).unwrap();
        let id = store
            .append(post("/posts").with_payload(json!({"title": "draft"})))
            .unwrap();
        store.increment_retry(&id).unwrap();
        id
    };

    let store = SqliteStore::open(&path).unwrap();
    let op = store.get(&id).unwrap().unwrap();
    assert_eq!(op.retry_count, 1);
    assert_eq!(op.payload, Some(json!({"title": "draft"})));
}

#[test]
fn get_missing_is_none() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.get("op-missing").unwrap().is_none());
}

#[test]
fn corrupt_kind_is_reported() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let id = store.append(post("/posts")).unwrap();
    store
        .conn
        .execute(
            "UPDATE pending_ops SET kind = 'upsert' WHERE id = ?1",
            params![id],
        )
        .unwrap();

    assert!(store.list().is_err());
}

#[test]
fn timestamps_are_stored_sortable() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let id = store.append(post("/posts")).unwrap();

    let stored: String = store
        .conn
        .query_row(
            "SELECT created_at FROM pending_ops WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(stored.ends_with('Z'));
    assert_eq!(stored.len(), "2026-01-01T00:00:00.000000Z".len());
}
