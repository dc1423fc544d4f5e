// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon identity file (§4.J): a UUIDv4 written once to
//! `<state-dir>/daemon.id`, stable across restarts. Used by clients to
//! detect that they reconnected to a different daemon instance (e.g. after
//! a state-dir wipe) rather than the same one resuming.
//!
//! Two daemons racing to create the file for the first time must converge
//! on the same id rather than each writing their own: the loser of the
//! `create_new` race reads back the winner's file instead of overwriting it.

use crate::error::DaemonError;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;
use uuid::Uuid;

/// Read the daemon id at `path`, creating it if absent or malformed.
pub fn ensure_daemon_id(path: &Path) -> Result<String, DaemonError> {
    if let Some(existing) = read_valid(path) {
        return Ok(existing);
    }

    let candidate = Uuid::new_v4().to_string();
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            writeln!(file, "{candidate}")?;
            Ok(candidate)
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => read_valid(path)
            .ok_or_else(|| DaemonError::MalformedDaemonId(path.display().to_string())),
        Err(err) => Err(err.into()),
    }
}

fn read_valid(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let trimmed = contents.trim();
    Uuid::parse_str(trimmed).ok()?;
    Some(trimmed.to_string())
}

#[cfg(test)]
#[path = "daemon_id_tests.rs"]
mod tests;
