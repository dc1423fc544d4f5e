// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-socket listener (§4.I): removes a stale socket file before
//! binding, then accepts connections and dispatches each to an isolated
//! task. One request per connection: read a `Command`, run it through the
//! router, write back the `SocketReply`, done.

use crate::router::Router;
use crate::wire::{read_message, write_message, WireError};
use attn_core::{Command, SocketReply};
use std::path::Path;
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, error, warn};

pub fn bind(path: &Path) -> std::io::Result<UnixListener> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    UnixListener::bind(path)
}

pub async fn run(listener: UnixListener, router: Arc<Router>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _)) => {
                        let router = router.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, &router).await {
                                match err {
                                    WireError::ConnectionClosed => debug!("client disconnected"),
                                    other => warn!(error = %other, "connection error"),
                                }
                            }
                        });
                    }
                    Err(err) => error!(error = %err, "accept error"),
                }
            }
            _ = shutdown.notified() => break,
        }
    }
}

async fn handle_connection(mut stream: UnixStream, router: &Router) -> Result<(), WireError> {
    let (mut reader, mut writer) = stream.split();
    let cmd: Command = read_message(&mut reader).await?;
    let (reply, _event): (SocketReply, _) = router.perform(cmd).await;
    write_message(&mut writer, &reply).await
}

#[cfg(test)]
#[path = "unix_tests.rs"]
mod tests;
