// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance lock (§4.J): an exclusive advisory lock on
//! `<state-dir>/daemon.lock`, held for the lifetime of the process so a
//! second `attnd` invocation fails fast instead of fighting the first one
//! over the same socket.

use crate::error::DaemonError;
use fs2::FileExt;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

pub struct LockFile {
    file: File,
}

impl LockFile {
    /// Acquire the lock at `path`, writing this process's pid once held.
    /// Returns [`DaemonError::AlreadyRunning`] (with the pid read back from
    /// the file, if any) when another instance already holds it.
    pub fn acquire(path: &Path) -> Result<Self, DaemonError> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if file.try_lock_exclusive().is_err() {
            let pid = std::fs::read_to_string(path)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
            return Err(DaemonError::AlreadyRunning(pid));
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Self { file })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
