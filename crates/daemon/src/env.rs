// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-driven configuration knobs (§4.J).

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WS_PORT: u16 = 9849;
const DEFAULT_PERSIST_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_PR_POLL_INTERVAL: Duration = Duration::from_secs(90);

/// Root directory for all daemon state: the snapshot, the `daemon.id`
/// file, and the Unix socket. Resolution order: `ATTN_STATE_DIR`, then
/// `XDG_STATE_HOME/attn`, then `~/.local/state/attn`.
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

/// WebSocket listen port, overridable for tests and multi-instance setups.
/// `ATTN_WS_PORT` takes precedence over the legacy `CM_WS_PORT` name.
pub fn ws_port() -> u16 {
    std::env::var("ATTN_WS_PORT")
        .ok()
        .or_else(|| std::env::var("CM_WS_PORT").ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WS_PORT)
}

/// Interval between periodic registry snapshots (§4.A).
pub fn persist_interval() -> Duration {
    std::env::var("ATTN_PERSIST_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PERSIST_INTERVAL)
}

/// Interval between PR sidebar refresh polls (§3 `PR_REFRESH_TTL`, §4.J).
pub fn pr_poll_interval() -> Duration {
    std::env::var("ATTN_PR_POLL_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PR_POLL_INTERVAL)
}

/// Path to the classifier script invoked by `ScriptClassifier`, overridable
/// via `ATTN_CLASSIFIER_SCRIPT`; defaults to `<state-dir>/classifier.sh`.
pub fn classifier_script_path() -> PathBuf {
    std::env::var("ATTN_CLASSIFIER_SCRIPT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join("classifier.sh"))
}

/// Path to the reviewer script invoked by `ScriptReviewer`, overridable via
/// `ATTN_REVIEWER_SCRIPT`; defaults to `<state-dir>/reviewer.sh`.
pub fn reviewer_script_path() -> PathBuf {
    std::env::var("ATTN_REVIEWER_SCRIPT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join("reviewer.sh"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
