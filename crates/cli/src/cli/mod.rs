// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Backend;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  outbox init --url https://api.example.com
  outbox enqueue create POST /posts --data '{\"title\":\"Hello\"}'
  outbox list                 Show what is waiting
  outbox sync                 Replay the queue now
  outbox run                  Keep syncing in the background";

#[derive(Parser, Debug)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first mutation queue with automatic replay")]
#[command(
    long_about = "Offline-first mutation queue with automatic replay.\n\n\
    Mutations are written to a durable local queue first and replayed against the \
    remote in order whenever the network allows."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if outbox was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a queue in the current directory
    Init {
        /// Base URL of the remote API
        #[arg(long, value_parser = non_empty_string)]
        url: String,

        /// Queue storage backend
        #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
        backend: Backend,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Queue a mutation and print its id
    #[command(arg_required_else_help = true)]
    Enqueue {
        /// Operation kind (create, update, delete)
        kind: String,

        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Endpoint path, joined onto the remote URL
        #[arg(value_parser = non_empty_string)]
        endpoint: String,

        /// JSON request body
        #[arg(long, short)]
        data: Option<String>,

        /// Only queue; do not try to deliver right away
        #[arg(long)]
        no_sync: bool,
    },

    /// List queued operations in replay order
    List {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show queue size and connectivity
    Status {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay the queue once
    Sync {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Drop every queued operation
    Clear,

    /// Sync in the foreground until interrupted
    Run,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
