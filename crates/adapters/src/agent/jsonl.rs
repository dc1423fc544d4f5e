// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared JSONL transcript-line parsing for agents that share Claude
//! Code's session-log shape (currently Claude and Codex). Ported from the
//! teacher's `parse_state_from_line`/`detect_error` in
//! `adapters/src/agent/watcher.rs`: a non-null `stop_reason` means the
//! agent is between turns and momentarily misreported as working, a
//! `tool_use`/`thinking` content block means the agent is actively
//! working, and anything else assistant-shaped means it is waiting on the
//! user. The session-state vocabulary here has no `failed` state, so a
//! detected error becomes a log line rather than a state override.

use super::LineOutcome;
use attn_core::SessionState;

pub(super) fn handle_line(line: &str) -> LineOutcome {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(line) else {
        return LineOutcome::default();
    };

    if let Some(message) = detect_error(&json) {
        return LineOutcome { log: Some(message), state: None };
    }

    if json.get("type").and_then(|v| v.as_str()) != Some("assistant") {
        return LineOutcome::default();
    }

    let msg = json.get("message");
    let stop_reason = msg.and_then(|m| m.get("stop_reason"));
    if matches!(stop_reason, Some(sr) if !sr.is_null()) {
        return LineOutcome {
            log: Some(format!("unexpected non-null stop_reason {stop_reason:?}, assuming working")),
            state: Some(SessionState::Working),
        };
    }

    // Both tool_use and thinking blocks indicate the agent is actively working.
    let has_active = msg
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_array())
        .is_some_and(|arr| {
            arr.iter().any(|item| {
                matches!(
                    item.get("type").and_then(|v| v.as_str()),
                    Some("tool_use" | "thinking")
                )
            })
        });

    let state = if has_active { SessionState::Working } else { SessionState::WaitingInput };
    LineOutcome { log: None, state: Some(state) }
}

fn detect_error(json: &serde_json::Value) -> Option<String> {
    let err = json.get("error").and_then(|v| v.as_str()).or_else(|| {
        json.get("message")
            .and_then(|m| m.get("error"))
            .and_then(|v| v.as_str())
    })?;
    let lower = err.to_lowercase();
    let has = |ps: &[&str]| ps.iter().any(|p| lower.contains(p));
    let category = if has(&["unauthorized", "invalid api key"]) {
        "unauthorized"
    } else if has(&["credit", "quota", "billing"]) {
        "out_of_credits"
    } else if has(&["network", "connection", "offline"]) {
        "no_internet"
    } else if has(&["rate limit", "too many requests"]) {
        "rate_limited"
    } else {
        "other"
    };
    Some(format!("agent reported error ({category}): {err}"))
}

/// Extract the assistant-visible text from one JSONL transcript line, if
/// the line is an assistant message. Understands the common
/// `{"type":"assistant","message":{"content":[{"type":"text","text":"..."}]}}`
/// shape.
pub(super) fn handle_assistant_message(line: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    if value.get("type")?.as_str()? != "assistant" {
        return None;
    }
    let content = value.get("message")?.get("content")?.as_array()?;
    let text: String = content
        .iter()
        .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
