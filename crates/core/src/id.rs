// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::op::NewOperation;

/// Prefix shared by every operation id.
pub const ID_PREFIX: &str = "op";

static NONCE: AtomicU64 = AtomicU64::new(0);

/// Generate an operation ID from the operation, its timestamp and a nonce.
/// Format: op-{hash} where hash is first 12 hex chars of SHA256(kind + method + endpoint + timestamp + nonce)
pub fn generate_id(op: &NewOperation, created_at: &DateTime<Utc>, nonce: u64) -> String {
    let input = format!(
        "{}{}{}{}{}",
        op.kind,
        op.method,
        op.endpoint,
        created_at.to_rfc3339(),
        nonce
    );
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..6]);
    format!("{}-{}", ID_PREFIX, short_hash)
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
///
/// The nonce mixes in the process id and a process-local counter so two
/// identical operations queued in the same instant still hash differently.
pub fn generate_unique_id<F>(op: &NewOperation, created_at: &DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let nonce = (u64::from(std::process::id()) << 32) ^ NONCE.fetch_add(1, Ordering::Relaxed);
    let base_id = generate_id(op, created_at, nonce);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
