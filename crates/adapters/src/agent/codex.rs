// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codex agent behavior: §4.C PTY verdict policy — applies `working` and
//! `pending_approval` verdicts, ignores `waiting_input` and `idle`.
//!
//! Codex has no teacher-provided transcript convention; this mirrors the
//! Claude Code on-disk layout (a per-project directory of per-session JSONL
//! files under a config dir honoring an env override), the only concrete
//! transcript-discovery pattern the corpus provides, generalized to Codex's
//! own config directory and env var name. Codex's session log shares the
//! same `{"type":"assistant",...}` shape, so line parsing delegates to the
//! same [`jsonl`] helpers Claude uses.

use super::{jsonl, AgentBehavior, LineOutcome};
use attn_core::{AgentKind, SessionState};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default)]
pub struct CodexBehavior;

impl AgentBehavior for CodexBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::Codex
    }

    fn find_transcript(&self, project_path: &Path, session_id: &str) -> Option<PathBuf> {
        let config_dir = codex_config_dir()?;
        let project_dir = config_dir.join("sessions").join(project_dir_name(project_path));
        let direct = project_dir.join(format!("{session_id}.jsonl"));
        if direct.exists() {
            return Some(direct);
        }
        let entries = std::fs::read_dir(&project_dir).ok()?;
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("jsonl"))
            .max_by_key(|path| {
                std::fs::metadata(path)
                    .and_then(|meta| meta.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
            })
    }

    fn reconcile_pty_verdict(
        &self,
        _current: SessionState,
        verdict: SessionState,
    ) -> Option<SessionState> {
        match verdict {
            SessionState::Working | SessionState::PendingApproval => Some(verdict),
            SessionState::WaitingInput | SessionState::Idle | SessionState::Unknown => None,
        }
    }

    fn handle_line(&self, line: &str, _now: Instant, _current_state: SessionState) -> LineOutcome {
        jsonl::handle_line(line)
    }

    fn handle_assistant_message(&self, line: &str) -> Option<String> {
        jsonl::handle_assistant_message(line)
    }
}

fn codex_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CODEX_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".codex"))
}

fn project_dir_name(project_path: &Path) -> String {
    let canonical = project_path
        .canonicalize()
        .unwrap_or_else(|_| project_path.to_path_buf());
    canonical
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '.' { '-' } else { c })
        .collect()
}

#[cfg(test)]
#[path = "codex_tests.rs"]
mod tests;
