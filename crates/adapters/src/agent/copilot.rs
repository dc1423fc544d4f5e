// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Copilot agent behavior: §4.C PTY verdict policy — applies every verdict
//! except a `working` verdict arriving while the session is currently
//! `pending_approval`, which is ignored.
//!
//! Copilot has no file-based transcript convention in the corpus; it is
//! PTY-scraped only, so `find_transcript` always returns `None`.

use super::AgentBehavior;
use attn_core::{AgentKind, SessionState};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default)]
pub struct CopilotBehavior;

impl AgentBehavior for CopilotBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::Copilot
    }

    fn find_transcript(&self, _project_path: &Path, _session_id: &str) -> Option<PathBuf> {
        None
    }

    fn reconcile_pty_verdict(
        &self,
        current: SessionState,
        verdict: SessionState,
    ) -> Option<SessionState> {
        if verdict == SessionState::Working && current == SessionState::PendingApproval {
            return None;
        }
        Some(verdict)
    }
}

#[cfg(test)]
#[path = "copilot_tests.rs"]
mod tests;
