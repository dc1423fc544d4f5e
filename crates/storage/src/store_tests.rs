// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use attn_core::AgentKind;
use std::time::Duration;

fn t(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn register(store: &Store, id: &str, label: &str, now: SystemTime) {
    store.add_session(Session::new(
        SessionId::new(id),
        label.to_string(),
        AgentKind::Claude,
        PathBuf::from("/home/user/project"),
        now,
    ));
}

#[test]
fn register_then_query_returns_exactly_one_waiting_input() {
    let store = Store::new();
    register(&store, "sess-1", "drumstick", t(0));

    let all = store.list_sessions("");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].label, "drumstick");
    assert_eq!(all[0].state, SessionState::WaitingInput);
}

#[test]
fn update_state_no_op_on_missing_session() {
    let store = Store::new();
    assert!(store.update_session_state(&SessionId::new("ghost"), SessionState::Working, t(1)).is_none());
}

#[test]
fn update_state_then_get_reflects_new_state() {
    let store = Store::new();
    register(&store, "sess-1", "l", t(0));
    store.update_session_state(&SessionId::new("sess-1"), SessionState::Working, t(5));

    let s = store.get_session(&SessionId::new("sess-1")).unwrap();
    assert_eq!(s.state, SessionState::Working);
    assert!(s.state_updated_at >= t(0));
}

#[test]
fn query_filters_by_state_string() {
    let store = Store::new();
    register(&store, "sess-1", "a", t(0));
    store.update_session_state(&SessionId::new("sess-1"), SessionState::Working, t(1));

    assert_eq!(store.list_sessions("working").len(), 1);
    assert_eq!(store.list_sessions("waiting_input").len(), 0);
}

#[test]
fn remove_session_drops_it_from_list_and_order() {
    let store = Store::new();
    register(&store, "sess-1", "a", t(0));
    store.remove_session(&SessionId::new("sess-1"));
    assert!(store.list_sessions("").is_empty());
    assert!(store.get_session(&SessionId::new("sess-1")).is_none());
}

#[test]
fn list_sessions_preserves_insertion_order() {
    let store = Store::new();
    register(&store, "sess-1", "first", t(0));
    register(&store, "sess-2", "second", t(1));
    register(&store, "sess-3", "third", t(2));

    let labels: Vec<_> = store.list_sessions("").into_iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["first", "second", "third"]);
}

#[test]
fn reconcile_worktrees_adopts_and_prunes() {
    let store = Store::new();
    let main_repo = PathBuf::from("/repo");
    store.add_worktree(Worktree::new(
        PathBuf::from("/repo--stale"),
        "stale".to_string(),
        main_repo.clone(),
        t(0),
    ));

    let ground_truth = vec![Worktree::new(
        PathBuf::from("/repo--fresh"),
        "fresh".to_string(),
        main_repo.clone(),
        t(0),
    )];
    store.reconcile_worktrees(&main_repo, ground_truth, t(10));

    let listed = store.list_worktrees(&main_repo);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, PathBuf::from("/repo--fresh"));
    assert_eq!(listed[0].created_at, t(10), "adopted entries get created_at = now");
}

#[test]
fn subscribe_then_unsubscribe_round_trips() {
    let store = Store::new();
    let key = SubscriptionKey::new("slack", "C123", None);
    store.subscribe(key.clone(), SessionId::new("sess-1"));
    assert_eq!(store.subscriptions_for(&key), vec![SessionId::new("sess-1")]);

    store.unsubscribe(&key, &SessionId::new("sess-1"));
    assert!(store.subscriptions_for(&key).is_empty());
}
