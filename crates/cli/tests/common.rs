// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so the remote is always unreachable.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn outbox() -> Command {
    cargo_bin_cmd!("outbox")
}

/// Helper to create an initialized temp directory pointing at `url`
pub fn init_temp_with(url: &str, backend: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    outbox()
        .args(["init", "--url", url, "--backend", backend])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory with an unreachable remote
pub fn init_temp() -> TempDir {
    init_temp_with(UNREACHABLE_URL, "sqlite")
}

/// Helper to queue an operation without syncing and return its id
pub fn enqueue(temp: &TempDir, kind: &str, method: &str, endpoint: &str) -> String {
    let output = outbox()
        .args(["enqueue", kind, method, endpoint, "--no-sync"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Minimal HTTP server answering every request with `status_line`.
///
/// Returns the base URL and the request lines ("POST /posts") it has seen.
pub fn serve(status_line: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(request_line) = read_request(&mut stream) else {
                // Connectivity probes connect and hang up without a request.
                continue;
            };
            log.lock().unwrap().push(request_line);
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: 2\r\ncontent-type: application/json\r\nconnection: close\r\n\r\n{{}}"
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (url, seen)
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            let first = text.lines().next()?;
            let mut parts = first.split_whitespace();
            return Some(format!("{} {}", parts.next()?, parts.next()?));
        }
    }
}
