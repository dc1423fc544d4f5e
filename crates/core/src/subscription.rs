// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-platform subscriptions: which sessions notify which chat thread
//! (§3 Data model, §4.K chat-platform collaborator).

use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Addresses a single thread on a chat platform. `thread_ts` is optional
/// since not every platform nests messages into threads; `None` means the
/// subscription targets the channel directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionKey {
    pub platform: String,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl SubscriptionKey {
    pub fn new(platform: impl Into<String>, channel_id: impl Into<String>, thread_ts: Option<String>) -> Self {
        Self {
            platform: platform.into(),
            channel_id: channel_id.into(),
            thread_ts,
        }
    }
}

/// A thread's set of subscribed sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub session_ids: HashSet<SessionId>,
}

impl Subscription {
    pub fn subscribe(&mut self, session_id: SessionId) -> bool {
        self.session_ids.insert(session_id)
    }

    pub fn unsubscribe(&mut self, session_id: &SessionId) -> bool {
        self.session_ids.remove(session_id)
    }

    pub fn is_empty(&self) -> bool {
        self.session_ids.is_empty()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
