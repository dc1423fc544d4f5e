// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session entity: a supervised agent invocation and its registry record.
//!
//! `SessionId` is chosen by the registering client, not generated here —
//! unlike most other ids in this crate it has no `IdGen` producer.

use crate::agent::{AgentKind, SessionState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

crate::define_id! {
    /// Opaque session identifier chosen by the registering client.
    pub struct SessionId;
}

/// In-memory record for one supervised agent session (§3 Data model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub label: String,
    pub agent: AgentKind,
    /// Absolute, canonicalised working directory.
    pub directory: PathBuf,
    pub state: SessionState,
    #[serde(with = "crate::rfc3339")]
    pub state_since: SystemTime,
    #[serde(with = "crate::rfc3339")]
    pub state_updated_at: SystemTime,
    #[serde(with = "crate::rfc3339")]
    pub last_seen: SystemTime,
    /// Free-form structured todo list, opaque to the daemon.
    #[serde(default)]
    pub todos: serde_json::Value,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub transcript_path: Option<PathBuf>,
}

impl Session {
    /// Construct a freshly-registered session. Per §8 scenario 1, the
    /// initial state is `waiting_input`.
    pub fn new(id: SessionId, label: String, agent: AgentKind, directory: PathBuf, now: SystemTime) -> Self {
        Self {
            id,
            label,
            agent,
            directory,
            state: SessionState::default(),
            state_since: now,
            state_updated_at: now,
            last_seen: now,
            todos: serde_json::Value::Null,
            muted: false,
            transcript_path: None,
        }
    }

    /// Apply a state update per §4.A `update_state` semantics: if `new`
    /// equals the current state, `state_since` is preserved and only
    /// `state_updated_at`/`last_seen` advance; otherwise all three advance.
    pub fn apply_state(&mut self, new: SessionState, now: SystemTime) {
        if new != self.state {
            self.state = new;
            self.state_since = now;
        }
        self.state_updated_at = now;
        self.last_seen = now;
    }

    pub fn touch(&mut self, now: SystemTime) {
        self.last_seen = now;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
