// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{init_work_dir, queue_path, Backend, Config};
use crate::error::Result;

pub fn run(url: String, backend: Backend, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    run_impl(&target_path, &url, backend, &mut std::io::stdout())
}

pub(crate) fn run_impl(
    target_path: &Path,
    url: &str,
    backend: Backend,
    out: &mut impl Write,
) -> Result<()> {
    let config = Config::new(url, backend)?;
    let work_dir = init_work_dir(target_path, &config)?;

    writeln!(out, "Initialized outbox at {}", work_dir.display())?;
    writeln!(out, "Remote: {}", config.remote.url)?;
    writeln!(
        out,
        "Queue: {} ({})",
        queue_path(&work_dir, &config).display(),
        backend
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
