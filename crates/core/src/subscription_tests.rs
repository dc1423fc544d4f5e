// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn subscribe_is_idempotent() {
    let mut sub = Subscription::default();
    assert!(sub.subscribe(SessionId::new("sess-1")));
    assert!(!sub.subscribe(SessionId::new("sess-1")));
    assert_eq!(sub.session_ids.len(), 1);
}

#[test]
fn unsubscribe_removes_and_reports_presence() {
    let mut sub = Subscription::default();
    sub.subscribe(SessionId::new("sess-1"));
    assert!(sub.unsubscribe(&SessionId::new("sess-1")));
    assert!(!sub.unsubscribe(&SessionId::new("sess-1")));
    assert!(sub.is_empty());
}

#[test]
fn key_with_no_thread_is_distinct_from_key_with_thread() {
    let channel = SubscriptionKey::new("slack", "C123", None);
    let thread = SubscriptionKey::new("slack", "C123", Some("171.0001".to_string()));
    assert_ne!(channel, thread);
}
