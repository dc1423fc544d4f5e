// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent capability descriptors: transcript discovery, bootstrap byte
//! offsets, the PTY verdict reconciliation policy table (§4.C, §4.D), and
//! the transcript-watcher behaviour hooks (§4.D, §9) that let one generic
//! watcher loop in `attn-engine` drive agent-specific line parsing,
//! dedup, and quiet-window policy.
//!
//! `attn-engine` owns the generic watcher-pool loop and PTY interpreter
//! algorithms; this module only supplies the per-`AgentKind` knowledge
//! those algorithms need.

mod claude;
mod codex;
mod copilot;
mod jsonl;

pub use claude::ClaudeBehavior;
pub use codex::CodexBehavior;
pub use copilot::CopilotBehavior;

use attn_core::{AgentKind, SessionState};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

/// Outcome of inspecting one complete transcript line (§4.D).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineOutcome {
    /// A message worth logging at the watcher's debug level, if any.
    pub log: Option<String>,
    /// A heuristic state verdict this line implies, reconciled through
    /// [`AgentBehavior::reconcile_pty_verdict`] like any other verdict.
    pub state: Option<SessionState>,
}

/// Outcome of a behaviour's periodic tick, run once per poll iteration
/// after all lines read in that iteration have been processed (§9).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub log: Option<String>,
    pub state: Option<SessionState>,
    /// If true, skip this iteration's classification dispatch check
    /// entirely, regardless of quiet-window elapsed time.
    pub block_classification: bool,
}

/// Per-agent knowledge the transcript watcher and PTY interpreter need.
pub trait AgentBehavior: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Locate the transcript (session log) file for `session_id` under
    /// `project_path`, if the agent keeps one.
    fn find_transcript(&self, project_path: &Path, session_id: &str) -> Option<PathBuf>;

    /// Byte offset to start tailing `transcript` from when the watcher
    /// first discovers it, so pre-existing content is not replayed as new.
    fn bootstrap_offset(&self, transcript: &Path) -> u64 {
        std::fs::metadata(transcript).map(|m| m.len()).unwrap_or(0)
    }

    /// Reconcile a PTY-scrape verdict against the session's current state,
    /// per this agent's §4.C policy table. Returns `None` to mean "ignore
    /// the verdict, keep `current`".
    fn reconcile_pty_verdict(
        &self,
        current: SessionState,
        verdict: SessionState,
    ) -> Option<SessionState>;

    /// Env var name that disables transcript watching for this agent when
    /// set to `"0"` (e.g. `ATTN_AGENT_CLAUDE_TRANSCRIPT`).
    fn transcript_env_override(&self) -> String {
        format!("ATTN_AGENT_{}_TRANSCRIPT", self.kind().as_str().to_uppercase())
    }

    /// Whether transcript watching is currently enabled for this agent,
    /// honoring `transcript_env_override`.
    fn transcript_watching_enabled(&self) -> bool {
        crate::env::agent_transcript_enabled(self.kind().as_str())
    }

    /// Inspect one complete raw transcript line. May surface a log line
    /// and/or a heuristic state override. The default implementation
    /// parses nothing, appropriate for agents with no transcript
    /// (`find_transcript` returning `None` means the watcher never calls
    /// this anyway).
    fn handle_line(&self, line: &str, now: Instant, current_state: SessionState) -> LineOutcome {
        let _ = (line, now, current_state);
        LineOutcome::default()
    }

    /// Extract the assistant-visible textual content from one transcript
    /// line, if the line carries one.
    fn handle_assistant_message(&self, line: &str) -> Option<String> {
        let _ = line;
        None
    }

    /// Whether consecutive identical assistant messages observed within
    /// the dedup window should be collapsed into a single event.
    fn deduplicate_assistant_events(&self) -> bool {
        true
    }

    /// Called once per poll iteration, after all complete lines read in
    /// that iteration have been run through `handle_line`.
    fn tick(&self, now: Instant, current_state: SessionState) -> TickOutcome {
        let _ = (now, current_state);
        TickOutcome::default()
    }

    /// The instant from which the quiet window should be measured, given
    /// the instant an assistant message was just recorded. Default: the
    /// recorded instant itself, i.e. no per-agent adjustment.
    fn quiet_since(&self, last_assistant_at: Instant) -> Instant {
        last_assistant_at
    }

    /// Whether a classification dispatch that would otherwise fire should
    /// be skipped this round, and if so why (for logging).
    fn skip_classification(
        &self,
        current_state: SessionState,
        last_seen: SystemTime,
        now: SystemTime,
    ) -> (bool, Option<&'static str>) {
        let _ = (current_state, last_seen, now);
        (false, None)
    }

    /// Reset any per-watcher state the behaviour itself maintains, called
    /// when the watcher rediscovers or rewinds its transcript. Stateless
    /// behaviours (all three built-in ones) need not override this.
    fn reset(&self) {}

    /// Upper bound, in bytes, on the transcript delta handed to the
    /// classifier dispatcher per request (§4.E).
    fn max_classify_bytes(&self) -> usize {
        64 * 1024
    }
}

/// Resolve the behavior for a given agent kind. Unknown/`Other` kinds fall
/// back to Claude's behavior, since it applies PTY verdicts unconditionally
/// and is therefore the safest default.
pub fn behavior_for(kind: &AgentKind) -> Box<dyn AgentBehavior> {
    match kind {
        AgentKind::Claude => Box::new(ClaudeBehavior),
        AgentKind::Codex => Box::new(CodexBehavior),
        AgentKind::Copilot => Box::new(CopilotBehavior),
        AgentKind::Other(_) => Box::new(ClaudeBehavior),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
