// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 1: register a session, then query it back.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn a_registered_session_shows_up_in_an_unfiltered_query() {
    let project = Project::empty();

    let register = project.send(&serde_json::json!({
        "cmd": "register",
        "id": "sess-alpha",
        "label": "fix the flaky test",
        "agent": "claude",
        "directory": project.path(),
    }));
    assert!(register.success(), "register should succeed: {}", register.stderr());
    assert_eq!(register.reply_json()["ok"], true);

    let query = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    let reply = query.reply_json();
    assert_eq!(reply["ok"], true);

    let sessions = reply["sessions"].as_array().expect("sessions array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], "sess-alpha");
    assert_eq!(sessions[0]["label"], "fix the flaky test");
}

#[test]
#[serial]
fn querying_an_empty_registry_returns_an_empty_list_not_an_error() {
    let project = Project::empty();
    let query = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    let reply = query.reply_json();
    assert_eq!(reply["ok"], true);
    assert_eq!(reply["sessions"].as_array().expect("sessions array").len(), 0);
}

#[test]
#[serial]
fn unregister_removes_the_session_from_later_queries() {
    let project = Project::empty();
    project.send(&serde_json::json!({
        "cmd": "register",
        "id": "sess-beta",
        "label": "beta",
        "agent": "claude",
        "directory": project.path(),
    }));

    let unregister = project.send(&serde_json::json!({"cmd": "unregister", "id": "sess-beta"}));
    assert_eq!(unregister.reply_json()["ok"], true);

    let query = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    assert_eq!(query.reply_json()["sessions"].as_array().expect("sessions array").len(), 0);
}
