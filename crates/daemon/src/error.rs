// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-shell error type: startup and transport failures that never
//! reach the command router (§4.I, §4.J).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] attn_storage::SnapshotError),
    #[error("another daemon instance is already running (pid {0})")]
    AlreadyRunning(u32),
    #[error("malformed daemon.id file at {0}")]
    MalformedDaemonId(String),
}
