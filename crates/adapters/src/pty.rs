// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PTY session spawn trait.
//!
//! Spawning the PTY child that actually runs a coding agent is explicitly
//! out of core scope (§1 Non-goals): the daemon supervises sessions that
//! already exist. This trait is the seam a platform-specific launcher
//! would implement; the daemon ships only a no-op stub.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PtyError {
    #[error("pty spawning is not supported by this adapter")]
    Unsupported,
}

/// Adapter for spawning (or writing to) a PTY-backed agent session.
#[async_trait]
pub trait PtyAdapter: Send + Sync + 'static {
    async fn spawn(&self, cwd: &Path, command: &str) -> Result<String, PtyError>;
    async fn write_input(&self, session_id: &str, data: &[u8]) -> Result<(), PtyError>;
}

/// Stub adapter: every call fails with `Unsupported`. Used until a
/// platform-specific PTY launcher is wired in above this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPtyAdapter;

#[async_trait]
impl PtyAdapter for NoOpPtyAdapter {
    async fn spawn(&self, _cwd: &Path, _command: &str) -> Result<String, PtyError> {
        Err(PtyError::Unsupported)
    }

    async fn write_input(&self, _session_id: &str, _data: &[u8]) -> Result<(), PtyError> {
        Err(PtyError::Unsupported)
    }
}

#[cfg(test)]
#[path = "pty_tests.rs"]
mod tests;
