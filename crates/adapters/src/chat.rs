// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-platform bridge: lets a subscribed channel/thread receive session
//! events and send replies back as PTY input (§4.K chat routing). Real
//! platform bindings (Slack, Discord, ...) are out of scope for this
//! daemon core; this trait is the seam a platform-specific crate would
//! implement.

use async_trait::async_trait;
use attn_core::SubscriptionKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat platform error: {0}")]
    Failed(String),
}

/// A message received from a subscribed chat thread.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub key: SubscriptionKey,
    pub text: String,
}

/// Adapter for a chat platform's inbound message stream.
#[async_trait]
pub trait ChatAdapter: Send + Sync + 'static {
    /// Start listening for inbound messages, invoking `on_message` for each
    /// one. Returns once the connection is closed or an unrecoverable error
    /// occurs.
    async fn listen(
        &self,
        on_message: Box<dyn Fn(ChatMessage) + Send + Sync>,
    ) -> Result<(), ChatError>;

    /// Post a message to a subscribed thread (e.g. a session's state change).
    async fn post(&self, key: &SubscriptionKey, text: &str) -> Result<(), ChatError>;
}

/// Adapter that never connects to a platform; used when no chat integration
/// is configured. `listen` resolves immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpChatAdapter;

#[async_trait]
impl ChatAdapter for NoOpChatAdapter {
    async fn listen(
        &self,
        _on_message: Box<dyn Fn(ChatMessage) + Send + Sync>,
    ) -> Result<(), ChatError> {
        Ok(())
    }

    async fn post(&self, _key: &SubscriptionKey, _text: &str) -> Result<(), ChatError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
