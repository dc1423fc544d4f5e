// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-socket wire codec (§4.H, §4.I, §6): a message is a single JSON
//! object terminated by EOF on the connection — one request per
//! connection, synchronous response. No length prefix: a client writes
//! its JSON and shuts down (or closes) its write half, the daemon reads
//! to EOF, and vice versa for the reply. This matches a spec-conformant
//! external client that simply writes JSON and half-closes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest message this daemon will read or write. `PtyInput`/`PtyOutput`
/// payloads are base64 PTY bytes, so this needs to comfortably exceed a
/// single PTY read, but a bound still protects against a misbehaving peer
/// that never sends EOF.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },
    #[error("connection closed before a full message arrived")]
    ConnectionClosed,
}

/// Read one JSON object by reading until EOF. Fails closed if the
/// connection never produced a byte (nothing to parse).
pub async fn read_message<R: AsyncRead + Unpin, T: DeserializeOwned>(reader: &mut R) -> Result<T, WireError> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if body.len() + n > MAX_MESSAGE_SIZE {
            return Err(WireError::MessageTooLarge { size: body.len() + n, max: MAX_MESSAGE_SIZE });
        }
        body.extend_from_slice(&chunk[..n]);
    }
    if body.is_empty() {
        return Err(WireError::ConnectionClosed);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Write one JSON object, then shut down the write half so the peer's
/// `read_message` sees EOF and knows the message is complete.
pub async fn write_message<W: AsyncWrite + Unpin, T: Serialize>(writer: &mut W, message: &T) -> Result<(), WireError> {
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(WireError::MessageTooLarge { size: body.len(), max: MAX_MESSAGE_SIZE });
    }
    writer.write_all(&body).await?;
    writer.shutdown().await?;
    Ok(())
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
