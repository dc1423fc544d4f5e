// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn behavior_for_dispatches_by_kind() {
    assert_eq!(behavior_for(&AgentKind::Claude).kind(), AgentKind::Claude);
    assert_eq!(behavior_for(&AgentKind::Codex).kind(), AgentKind::Codex);
    assert_eq!(behavior_for(&AgentKind::Copilot).kind(), AgentKind::Copilot);
}

#[test]
fn behavior_for_unknown_agent_falls_back_to_claude() {
    let behavior = behavior_for(&AgentKind::Other("gemini".to_string()));
    assert_eq!(behavior.kind(), AgentKind::Claude);
}

/// Truth table over the §4.C policy for all three agents and every
/// `(current, verdict)` pair.
#[test]
fn policy_table_truth_table() {
    use SessionState::*;

    let claude = behavior_for(&AgentKind::Claude);
    for &current in &[Working, WaitingInput, Idle, PendingApproval] {
        for &verdict in &[Working, WaitingInput, Idle, PendingApproval] {
            assert_eq!(
                claude.reconcile_pty_verdict(current, verdict),
                Some(verdict),
                "claude should always apply ({current:?} -> {verdict:?})"
            );
        }
    }

    let codex = behavior_for(&AgentKind::Codex);
    for &current in &[Working, WaitingInput, Idle, PendingApproval] {
        assert_eq!(codex.reconcile_pty_verdict(current, Working), Some(Working));
        assert_eq!(
            codex.reconcile_pty_verdict(current, PendingApproval),
            Some(PendingApproval)
        );
        assert_eq!(codex.reconcile_pty_verdict(current, WaitingInput), None);
        assert_eq!(codex.reconcile_pty_verdict(current, Idle), None);
    }

    let copilot = behavior_for(&AgentKind::Copilot);
    for &verdict in &[WaitingInput, Idle, PendingApproval] {
        for &current in &[Working, WaitingInput, Idle, PendingApproval] {
            assert_eq!(
                copilot.reconcile_pty_verdict(current, verdict),
                Some(verdict)
            );
        }
    }
    assert_eq!(copilot.reconcile_pty_verdict(PendingApproval, Working), None);
    for &current in &[Working, WaitingInput, Idle] {
        assert_eq!(copilot.reconcile_pty_verdict(current, Working), Some(Working));
    }
}

#[test]
fn transcript_env_override_is_agent_specific() {
    assert_eq!(
        ClaudeBehavior.transcript_env_override(),
        "ATTN_AGENT_CLAUDE_TRANSCRIPT"
    );
    assert_eq!(
        CodexBehavior.transcript_env_override(),
        "ATTN_AGENT_CODEX_TRANSCRIPT"
    );
}
