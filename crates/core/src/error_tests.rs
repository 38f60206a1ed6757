// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_kind = { Error::InvalidKind("upsert".into()), "upsert" },
    invalid_method = { Error::InvalidMethod("FETCH".into()), "FETCH" },
    corrupted = { Error::CorruptedData("line 3".into()), "line 3" },
    lock = { Error::Lock("queue.jsonl.lock".into()), "locked" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_invalid_kind_has_hint() {
    let msg = Error::InvalidKind("upsert".into()).to_string();
    assert!(msg.contains("hint"));
    assert!(msg.contains("create, update, delete"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
