// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claude Code agent behavior: transcript discovery under `~/.claude`,
//! the §4.C PTY verdict policy (apply every verdict unconditionally), and
//! the JSONL session-log parsing this agent's transcript watcher uses to
//! surface heuristic state changes and assistant text between classifier
//! calls.

use super::{jsonl, AgentBehavior, LineOutcome};
use attn_core::{AgentKind, SessionState};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default)]
pub struct ClaudeBehavior;

impl AgentBehavior for ClaudeBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::Claude
    }

    fn find_transcript(&self, project_path: &Path, session_id: &str) -> Option<PathBuf> {
        find_session_log(project_path, session_id)
    }

    fn reconcile_pty_verdict(
        &self,
        _current: SessionState,
        verdict: SessionState,
    ) -> Option<SessionState> {
        Some(verdict)
    }

    fn handle_line(&self, line: &str, _now: Instant, _current_state: SessionState) -> LineOutcome {
        jsonl::handle_line(line)
    }

    fn handle_assistant_message(&self, line: &str) -> Option<String> {
        jsonl::handle_assistant_message(line)
    }
}

/// Root directory Claude Code stores project transcripts under, honoring
/// `CLAUDE_CONFIG_DIR` the way the CLI itself does.
fn claude_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CLAUDE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".claude"))
}

/// Claude Code's on-disk encoding of a project path: canonicalize, then
/// replace `/` and `.` with `-`.
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

/// Find the transcript for `session_id` under `project_path`.
///
/// Looks for `projects/<project_dir_name>/<session_id>.jsonl` under the
/// Claude config directory; falls back to the most-recently-modified
/// `.jsonl` file in that project directory, since Claude Code occasionally
/// renames a session's log file mid-session.
fn find_session_log(project_path: &Path, session_id: &str) -> Option<PathBuf> {
    let config_dir = claude_config_dir()?;
    find_session_log_in(&config_dir, project_path, session_id)
}

fn find_session_log_in(
    config_dir: &Path,
    project_path: &Path,
    session_id: &str,
) -> Option<PathBuf> {
    let project_dir = config_dir
        .join("projects")
        .join(project_dir_name(project_path));

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

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
