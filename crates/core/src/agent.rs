// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent kind and session-state vocabulary.
//!
//! `AgentKind` names the coding-agent CLI driving a session (claude, codex,
//! copilot, ...). `SessionState` is the semantic state machine the daemon
//! infers for each session; it is distinct from the raw classification
//! verdicts emitted by the PTY heuristics or the classifier collaborator
//! (see `attn-engine::interpreter`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The coding agent driving a session.
///
/// Unknown agent names round-trip as `Other(name)` rather than failing to
/// deserialize, since the wire format accepts any lowercase string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Claude,
    Codex,
    Copilot,
    Other(String),
}

impl AgentKind {
    pub fn as_str(&self) -> &str {
        match self {
            AgentKind::Claude => "claude",
            AgentKind::Codex => "codex",
            AgentKind::Copilot => "copilot",
            AgentKind::Other(s) => s,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for AgentKind {
    fn from(s: &str) -> Self {
        match s {
            "claude" => AgentKind::Claude,
            "codex" => AgentKind::Codex,
            "copilot" => AgentKind::Copilot,
            other => AgentKind::Other(other.to_string()),
        }
    }
}

impl From<String> for AgentKind {
    fn from(s: String) -> Self {
        AgentKind::from(s.as_str())
    }
}

impl Serialize for AgentKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AgentKind::from(s))
    }
}

/// Semantic state of a supervised session, as tracked in the registry.
///
/// Wire representation is the lowercase variant name (`§6` Session-state
/// vocabulary). A freshly-registered session starts `waiting_input`;
/// `Unknown` is reserved for classification verdicts the interpreter
/// cannot map to one of the other four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Working,
    WaitingInput,
    Idle,
    PendingApproval,
    Unknown,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::WaitingInput
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Working => "working",
            SessionState::WaitingInput => "waiting_input",
            SessionState::Idle => "idle",
            SessionState::PendingApproval => "pending_approval",
            SessionState::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
