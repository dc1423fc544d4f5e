// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PTY State Interpreter (§4.C): reconciles a classification verdict
//! (from PTY heuristics or the classifier collaborator) against a
//! session's current recorded state, per the session's agent policy.

use attn_adapters::behavior_for;
use attn_core::{Session, SessionId, SessionState};
use attn_storage::Store;
use std::time::SystemTime;

/// Apply `verdict`, observed at `observed_at`, to session `id`.
///
/// No-op if the session is unknown, or if `observed_at` predates the
/// session's `state_updated_at` (a late-arriving verdict must never
/// regress a more recent observation). The per-agent policy may also
/// decide to ignore the verdict outright (§4.C table); in that case the
/// session is returned unchanged.
pub fn apply_verdict(
    store: &Store,
    id: &SessionId,
    verdict: SessionState,
    observed_at: SystemTime,
) -> Option<Session> {
    let session = store.get_session(id)?;

    if observed_at < session.state_updated_at {
        return Some(session);
    }

    let behavior = behavior_for(&session.agent);
    match behavior.reconcile_pty_verdict(session.state, verdict) {
        Some(reconciled) => store.update_session_state(id, reconciled, observed_at),
        None => Some(session),
    }
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
