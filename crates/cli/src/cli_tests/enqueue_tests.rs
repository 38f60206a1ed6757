// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for the `enqueue` command.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::expect_used)]

use super::*;

#[test]
fn test_enqueue_positional_and_data() {
    let cli = Cli::try_parse_from([
        "outbox",
        "enqueue",
        "create",
        "POST",
        "/posts",
        "--data",
        r#"{"title":"Hello"}"#,
    ])
    .unwrap();

    match cli.command {
        Command::Enqueue {
            kind,
            method,
            endpoint,
            data,
            no_sync,
        } => {
            assert_eq!(kind, "create");
            assert_eq!(method, "POST");
            assert_eq!(endpoint, "/posts");
            assert_eq!(data.as_deref(), Some(r#"{"title":"Hello"}"#));
            assert!(!no_sync);
        }
        other => panic!("expected enqueue, got {other:?}"),
    }
}

#[test]
fn test_enqueue_short_data_and_no_sync() {
    let cli = Cli::try_parse_from([
        "outbox", "enqueue", "delete", "delete", "/posts/1", "-d", "{}", "--no-sync",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Command::Enqueue { no_sync: true, data: Some(_), .. }
    ));
}

#[test]
fn test_enqueue_requires_endpoint() {
    assert!(Cli::try_parse_from(["outbox", "enqueue", "create", "POST"]).is_err());
    assert!(Cli::try_parse_from(["outbox", "enqueue", "create", "POST", ""]).is_err());
}
