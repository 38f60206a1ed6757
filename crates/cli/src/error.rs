// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TransportError;

/// All possible errors that can occur in the outboxrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'outbox init --url <remote>' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid payload: {0}\n  hint: --data must be a JSON document, e.g. '{{\"title\":\"Hello\"}}'")]
    InvalidPayload(String),

    #[error("{0}")]
    Store(#[from] outbox_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
