// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `OUTBOX_LOG=debug`.
pub const LOG_ENV: &str = "OUTBOX_LOG";

/// Filter from `OUTBOX_LOG`, or `default` when unset or invalid.
pub fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Later calls are ignored.
pub fn setup_logging(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
