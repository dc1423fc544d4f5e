// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;

#[test]
fn reconcile_pty_verdict_always_applies() {
    let behavior = ClaudeBehavior;
    assert_eq!(
        behavior.reconcile_pty_verdict(SessionState::Idle, SessionState::Working),
        Some(SessionState::Working)
    );
    assert_eq!(
        behavior.reconcile_pty_verdict(SessionState::PendingApproval, SessionState::Idle),
        Some(SessionState::Idle)
    );
}

#[test]
fn find_session_log_in_prefers_exact_session_id_match() {
    let config_dir = tempfile::tempdir().unwrap();
    let project_path = tempfile::tempdir().unwrap();
    let project_dir = config_dir
        .path()
        .join("projects")
        .join(project_dir_name(project_path.path()));
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("other-session.jsonl"), "{}").unwrap();
    fs::write(project_dir.join("session-123.jsonl"), "{}").unwrap();

    let found = find_session_log_in(config_dir.path(), project_path.path(), "session-123").unwrap();
    assert_eq!(found.file_name().unwrap(), "session-123.jsonl");
}

#[test]
fn find_session_log_in_falls_back_to_most_recent_jsonl() {
    let config_dir = tempfile::tempdir().unwrap();
    let project_path = tempfile::tempdir().unwrap();
    let project_dir = config_dir
        .path()
        .join("projects")
        .join(project_dir_name(project_path.path()));
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("stale.jsonl"), "{}").unwrap();

    let found =
        find_session_log_in(config_dir.path(), project_path.path(), "unknown-session").unwrap();
    assert_eq!(found.file_name().unwrap(), "stale.jsonl");
}

#[test]
fn find_session_log_in_returns_none_when_project_dir_missing() {
    let config_dir = tempfile::tempdir().unwrap();
    let project_path = tempfile::tempdir().unwrap();
    assert!(find_session_log_in(config_dir.path(), project_path.path(), "whatever").is_none());
}
