// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use outbox_core::{Method, NewOperation, OperationKind};
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_init_and_load_config() {
    let temp = TempDir::new().unwrap();
    let config = Config::new("https://api.example.com", Backend::Sqlite).unwrap();
    let work_dir = init_work_dir(temp.path(), &config).unwrap();

    assert_eq!(work_dir, temp.path().join(".outbox"));
    assert_eq!(Config::load(&work_dir).unwrap(), config);
    assert!(work_dir.join("queue.db").exists());
}

#[test]
fn test_defaults_fill_missing_sections() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[remote]\nurl = \"http://localhost:8080\"\n",
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();

    assert_eq!(config.remote.timeout_secs, 30);
    assert_eq!(config.queue.backend, Backend::Sqlite);
    assert_eq!(config.sync.interval_secs, 300);
    assert_eq!(config.sync.max_retries, 3);
    assert_eq!(config.network.probe_interval_secs, 15);
    assert_eq!(config.probe_timeout(), Duration::from_millis(2000));
}

#[test]
fn test_jsonl_backend_round_trips_through_toml() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::new("https://api.example.com/v2", Backend::Jsonl).unwrap();
    config.remote.token_env = Some("OUTBOX_TEST_TOKEN".into());
    config.save(temp.path()).unwrap();

    let text = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(text.contains("backend = \"jsonl\""));
    assert_eq!(Config::load(temp.path()).unwrap(), config);
}

#[parameterized(
    not_a_url = { "nope" },
    wrong_scheme = { "ftp://example.com" },
    websocket = { "ws://example.com" },
)]
fn test_invalid_remote_url(url: &str) {
    let err = Config::new(url, Backend::Sqlite).unwrap_err();
    assert!(err.to_string().contains("config error"), "{err}");
}

#[test]
fn test_zero_interval_is_rejected() {
    let mut config = Config::new("http://localhost", Backend::Sqlite).unwrap();
    config.sync.interval_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_already_initialized() {
    let temp = TempDir::new().unwrap();
    let config = Config::new("http://localhost", Backend::Sqlite).unwrap();
    init_work_dir(temp.path(), &config).unwrap();

    let err = init_work_dir(temp.path(), &config).unwrap_err();
    assert!(err.to_string().contains("already initialized"));
}

#[test]
fn test_find_work_dir_walks_up() {
    let temp = TempDir::new().unwrap();
    let config = Config::new("http://localhost", Backend::Sqlite).unwrap();
    let work_dir = init_work_dir(temp.path(), &config).unwrap();
    let nested = temp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_work_dir_from(&nested).unwrap(), work_dir);
}

#[test]
fn test_find_work_dir_not_initialized() {
    let temp = TempDir::new().unwrap();
    let result = find_work_dir_from(temp.path());
    assert!(matches!(result, Err(Error::NotInitialized)));
}

#[parameterized(
    sqlite = { Backend::Sqlite, "queue.db" },
    jsonl = { Backend::Jsonl, "queue.jsonl" },
)]
fn test_open_store_uses_configured_backend(backend: Backend, file_name: &str) {
    let temp = TempDir::new().unwrap();
    let config = Config::new("http://localhost", backend).unwrap();
    let work_dir = init_work_dir(temp.path(), &config).unwrap();

    let mut store = open_store(&work_dir, &config).unwrap();
    store
        .append(NewOperation::new(OperationKind::Delete, "/posts/1", Method::Delete))
        .unwrap();

    assert_eq!(queue_path(&work_dir, &config), work_dir.join(file_name));
    assert_eq!(open_store(&work_dir, &config).unwrap().count().unwrap(), 1);
}

#[test]
fn test_token_from_env() {
    let mut config = Config::new("http://localhost", Backend::Sqlite).unwrap();
    assert_eq!(config.token(), None);

    config.remote.token_env = Some("OUTBOX_CONFIG_TEST_UNSET_VAR".into());
    assert_eq!(config.token(), None);
}
