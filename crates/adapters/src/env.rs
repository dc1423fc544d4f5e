// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Transcript discovery poll interval, used while a session's log file has
/// not yet appeared on disk (default: 1000ms).
pub fn transcript_discovery_poll_ms() -> Duration {
    parse_duration_ms("ATTN_TRANSCRIPT_DISCOVERY_POLL_MS").unwrap_or(Duration::from_secs(1))
}

/// Whether a mock reviewer should be used instead of spawning the real
/// reviewer sub-process. Grounded in the Non-goals' allowance for scripted
/// test doubles over real third-party review tools.
pub fn mock_reviewer_enabled() -> bool {
    std::env::var("ATTN_MOCK_REVIEWER").as_deref() == Ok("1")
}

/// Per-agent override disabling transcript watching, e.g. `ATTN_AGENT_CLAUDE_TRANSCRIPT=0`.
pub fn agent_transcript_enabled(agent_kind: &str) -> bool {
    let var = format!("ATTN_AGENT_{}_TRANSCRIPT", agent_kind.to_uppercase());
    std::env::var(var).as_deref() != Ok("0")
}
