// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn pending(id: &str, secs: i64) -> PendingOperation {
    PendingOperation::from_new(
        id.to_string(),
        NewOperation::new(OperationKind::Update, "/posts/1", Method::Patch),
        at(secs),
    )
}

#[parameterized(
    lower = { "create", OperationKind::Create },
    upper = { "UPDATE", OperationKind::Update },
    mixed = { "Delete", OperationKind::Delete },
)]
fn kind_parse(input: &str, expected: OperationKind) {
    assert_eq!(input.parse::<OperationKind>().unwrap(), expected);
}

#[test]
fn kind_parse_rejects_unknown() {
    let err = "upsert".parse::<OperationKind>().unwrap_err();
    assert!(matches!(err, Error::InvalidKind(ref s) if s == "upsert"));
}

#[parameterized(
    get = { "get", Method::Get },
    post = { "POST", Method::Post },
    put = { "Put", Method::Put },
    patch = { "patch", Method::Patch },
    delete = { "DELETE", Method::Delete },
)]
fn method_parse(input: &str, expected: Method) {
    assert_eq!(input.parse::<Method>().unwrap(), expected);
    assert_eq!(expected.to_string(), input.to_uppercase());
}

#[test]
fn method_parse_rejects_unknown() {
    assert!(matches!(
        "FETCH".parse::<Method>(),
        Err(Error::InvalidMethod(_))
    ));
}

#[test]
fn from_new_starts_with_zero_retries() {
    let op = NewOperation::new(OperationKind::Create, "/posts", Method::Post)
        .with_payload(json!({"title": "hello"}));
    let pending = PendingOperation::from_new("op-1".into(), op, at(10));

    assert_eq!(pending.id, "op-1");
    assert_eq!(pending.retry_count, 0);
    assert_eq!(pending.created_at, at(10));
    assert_eq!(pending.payload, Some(json!({"title": "hello"})));
}

#[test]
fn serialized_form_uses_lowercase_kind_and_uppercase_method() {
    let json = serde_json::to_value(pending("op-1", 10)).unwrap();
    assert_eq!(json["kind"], "update");
    assert_eq!(json["method"], "PATCH");
    assert!(json.get("payload").is_none());
}

#[test]
fn deserialize_defaults_missing_retry_count() {
    let line = r#"{"id":"op-1","kind":"delete","endpoint":"/posts/1","method":"DELETE","created_at":"2026-01-01T00:00:00Z"}"#;
    let op: PendingOperation = serde_json::from_str(line).unwrap();
    assert_eq!(op.retry_count, 0);
    assert!(op.payload.is_none());
}

#[test]
fn sort_fifo_orders_by_created_at() {
    let mut ops = vec![pending("c", 30), pending("a", 10), pending("b", 20)];
    sort_fifo(&mut ops);
    let ids: Vec<_> = ops.iter().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn sort_fifo_keeps_storage_order_for_ties() {
    let mut ops = vec![pending("first", 10), pending("second", 10), pending("early", 5)];
    sort_fifo(&mut ops);
    let ids: Vec<_> = ops.iter().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, ["early", "first", "second"]);
}
