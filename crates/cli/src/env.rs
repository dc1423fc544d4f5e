// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Resolve the daemon's state directory: `ATTN_STATE_DIR` >
/// `XDG_STATE_HOME/attn` > `~/.local/state/attn`. Mirrors
/// `attn_daemon::env::state_dir` so the CLI finds the same socket the
/// daemon bound without linking against the daemon's private env module.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ATTN_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("attn");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".local").join("state").join("attn")
}

/// Override for the `attnd` binary path, for dev builds and tests.
pub fn daemon_binary() -> Option<String> {
    std::env::var("ATTN_DAEMON_BINARY").ok()
}

pub fn cargo_manifest_dir() -> Option<String> {
    std::env::var("CARGO_MANIFEST_DIR").ok()
}

pub fn timeout_ipc() -> Duration {
    parse_duration_ms("ATTN_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

pub fn timeout_connect() -> Duration {
    parse_duration_ms("ATTN_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

pub fn timeout_exit() -> Duration {
    parse_duration_ms("ATTN_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

pub fn poll_interval() -> Duration {
    parse_duration_ms("ATTN_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
