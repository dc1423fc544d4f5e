// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process management: starting, stopping, and probing `attnd`.

use crate::client::ClientError;
use attn_daemon::config::Config;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// Startup marker prefix `attnd` writes to its log before anything else.
const STARTUP_MARKER_PREFIX: &str = "--- attnd: starting (pid: ";

pub fn load_config() -> Result<Config, ClientError> {
    Config::load().map_err(ClientError::Io)
}

/// Start the daemon in the background, returning the child process handle.
pub fn start_daemon_background() -> Result<std::process::Child, ClientError> {
    let attnd_path = find_attnd_binary();

    Command::new(&attnd_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Find the `attnd` binary: an explicit override, a debug-build sibling
/// under `target/debug`, a sibling of the running `attn` binary, or
/// finally bare `attnd` resolved via `PATH`.
fn find_attnd_binary() -> PathBuf {
    if let Some(path) = crate::env::daemon_binary() {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().ok();
    let is_debug_build = current_exe
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.contains("target/debug"))
        .unwrap_or(false);

    if is_debug_build {
        if let Some(manifest_dir) = crate::env::cargo_manifest_dir() {
            let dev_path = PathBuf::from(manifest_dir)
                .parent()
                .and_then(|p| p.parent())
                .map(|p| p.join("target/debug/attnd"));
            if let Some(path) = dev_path {
                if path.exists() {
                    return path;
                }
            }
        }
    }

    if let Some(ref exe) = current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("attnd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("attnd")
}

/// Wait for a process to exit, polling at [`crate::env::poll_interval`].
pub async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(crate::env::poll_interval()).await;
    }
    false
}

fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid)
}

pub fn force_kill(pid: u32) -> bool {
    kill_signal("-9", pid)
}

pub fn terminate(pid: u32) -> bool {
    kill_signal("-15", pid)
}

/// Read the pid `attnd` wrote into its lock file (§4.J), if any.
pub fn read_daemon_pid(config: &Config) -> Option<u32> {
    std::fs::read_to_string(&config.lock_path).ok().and_then(|s| s.trim().parse().ok())
}

/// Probe whether a Unix socket is accepting connections.
pub fn probe_socket(socket_path: &std::path::Path) -> bool {
    std::os::unix::net::UnixStream::connect(socket_path).is_ok()
}

/// Remove a socket file left behind by a daemon that is no longer running.
pub fn cleanup_stale_socket(config: &Config) {
    if let Some(pid) = read_daemon_pid(config) {
        if process_exists(pid) {
            return;
        }
    }
    let _ = std::fs::remove_file(&config.socket_path);
}

/// Scan the daemon log for errors logged since the last startup marker.
pub fn read_startup_error(config: &Config) -> Option<String> {
    let content = std::fs::read_to_string(&config.log_path).ok()?;
    parse_startup_error(&content)
}

fn parse_startup_error(content: &str) -> Option<String> {
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    let errors: Vec<&str> =
        startup_log.lines().filter(|line| line.contains(" ERROR ") || line.contains("Failed to start")).collect();

    if errors.is_empty() {
        return None;
    }

    let messages: Vec<String> =
        errors.iter().filter_map(|line| line.split_once(": ").map(|(_, msg)| msg.to_string())).collect();

    if messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(messages.join("\n"))
    }
}

/// Wrap an error with startup log info if available.
pub fn wrap_with_startup_error(config: &Config, err: ClientError) -> ClientError {
    if matches!(err, ClientError::DaemonStartFailed(_)) {
        return err;
    }
    match read_startup_error(config) {
        Some(startup_error) => ClientError::DaemonStartFailed(startup_error),
        None => err,
    }
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
