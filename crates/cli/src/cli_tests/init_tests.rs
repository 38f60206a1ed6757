// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for the `init` command.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[parameterized(
    default_backend = { &["outbox", "init", "--url", "http://localhost"], Backend::Sqlite, None },
    jsonl = { &["outbox", "init", "--url", "http://localhost", "--backend", "jsonl"], Backend::Jsonl, None },
    with_path = { &["outbox", "init", "--url", "http://localhost", "--path", "/tmp/p"], Backend::Sqlite, Some("/tmp/p") },
)]
fn test_init_parses(args: &[&str], expected_backend: Backend, expected_path: Option<&str>) {
    let cli = parse(args).unwrap();
    match cli.command {
        Command::Init { url, backend, path } => {
            assert_eq!(url, "http://localhost");
            assert_eq!(backend, expected_backend);
            assert_eq!(path.as_deref(), expected_path);
        }
        other => panic!("expected init, got {other:?}"),
    }
}

#[parameterized(
    missing_url = { &["outbox", "init"] },
    empty_url = { &["outbox", "init", "--url", "  "] },
    unknown_backend = { &["outbox", "init", "--url", "http://x", "--backend", "redis"] },
)]
fn test_init_rejects(args: &[&str]) {
    assert!(parse(args).is_err());
}
