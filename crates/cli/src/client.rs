// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client: dials the Unix socket, sends one [`Command`], and
//! returns the [`SocketReply`]. Auto-starts `attnd` when it isn't running
//! (§4.I: one request per connection).

use crate::daemon_process::{
    cleanup_stale_socket, load_config, probe_socket, read_daemon_pid, start_daemon_background,
    terminate, wait_for_exit, wrap_with_startup_error,
};
use attn_core::{Command, SocketReply};
use attn_daemon::config::Config;
use attn_daemon::wire::{self, WireError};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,
    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),
    #[error("timed out waiting for daemon to start")]
    DaemonStartTimeout,
    #[error("wire protocol error: {0}")]
    Wire(#[from] WireError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DaemonClient {
    config: Config,
}

impl DaemonClient {
    /// Connect to an existing daemon, auto-starting one if none is running.
    pub fn connect_or_start() -> Result<Self, ClientError> {
        let config = load_config()?;

        match Self::connect_inner(&config) {
            Ok(client) => {
                if probe_socket(&client.config.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket(&config);
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(config, child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(config, child)
            }
            Err(e) => Err(wrap_with_startup_error(&config, e)),
        }
    }

    /// Connect to an existing daemon; fails if none is running.
    pub fn connect() -> Result<Self, ClientError> {
        let config = load_config()?;
        Self::connect_inner(&config)
    }

    fn connect_inner(config: &Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self { config: config.clone() })
    }

    fn connect_with_retry(config: Config, mut child: std::process::Child) -> Result<Self, ClientError> {
        let start = Instant::now();
        let timeout = crate::env::timeout_connect();

        while start.elapsed() < timeout {
            if let Ok(Some(status)) = child.try_wait() {
                return Err(match read_startup_error_after_exit(&config) {
                    Some(err) => ClientError::DaemonStartFailed(err),
                    None => ClientError::DaemonStartFailed(format!("exited with {status}")),
                });
            }

            match Self::connect_inner(&config) {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => std::thread::sleep(crate::env::poll_interval()),
                Err(e) => return Err(wrap_with_startup_error(&config, e)),
            }
        }

        Err(wrap_with_startup_error(&config, ClientError::DaemonStartTimeout))
    }

    /// Send a command and wait for the reply, honoring the IPC timeout.
    pub async fn send(&self, command: &Command) -> Result<SocketReply, ClientError> {
        let timeout = crate::env::timeout_ipc();
        let stream = UnixStream::connect(&self.config.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        tokio::time::timeout(timeout, wire::write_message(&mut writer, command))
            .await
            .map_err(|_| WireError::ConnectionClosed)??;

        let reply = tokio::time::timeout(timeout, wire::read_message(&mut reader))
            .await
            .map_err(|_| WireError::ConnectionClosed)??;

        Ok(reply)
    }

    /// Stop the daemon: graceful `SIGTERM`, then `SIGKILL` if it lingers.
    /// Returns `false` if no daemon was running.
    pub async fn stop(&self) -> bool {
        let Some(pid) = read_daemon_pid(&self.config) else {
            return false;
        };
        if !crate::daemon_process::process_exists(pid) {
            return false;
        }

        terminate(pid);
        if !wait_for_exit(pid, crate::env::timeout_exit()).await {
            crate::daemon_process::force_kill(pid);
            wait_for_exit(pid, crate::env::timeout_exit()).await;
        }
        true
    }

    pub fn socket_path(&self) -> PathBuf {
        self.config.socket_path.clone()
    }
}

fn read_startup_error_after_exit(config: &Config) -> Option<String> {
    let deadline = Instant::now() + crate::env::timeout_exit();
    while Instant::now() < deadline {
        if let Some(err) = crate::daemon_process::read_startup_error(config) {
            return Some(err);
        }
        std::thread::sleep(crate::env::poll_interval());
    }
    None
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
