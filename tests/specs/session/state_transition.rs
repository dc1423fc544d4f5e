// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 2: a session's state transitions and is visible
//! both unfiltered and through a state filter.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn a_state_update_is_reflected_in_a_filtered_query() {
    let project = Project::empty();
    project.send(&serde_json::json!({
        "cmd": "register",
        "id": "sess-gamma",
        "label": "gamma",
        "agent": "codex",
        "directory": project.path(),
    }));

    let update = project.send(&serde_json::json!({"cmd": "state", "id": "sess-gamma", "state": "working"}));
    assert_eq!(update.reply_json()["ok"], true);

    let working_only = project.send(&serde_json::json!({"cmd": "query", "filter": "working"}));
    let sessions = working_only.reply_json()["sessions"].as_array().expect("sessions array").clone();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], "sess-gamma");
    assert_eq!(sessions[0]["state"], "working");

    let waiting_only = project.send(&serde_json::json!({"cmd": "query", "filter": "waiting_input"}));
    assert_eq!(waiting_only.reply_json()["sessions"].as_array().expect("sessions array").len(), 0);
}

#[test]
#[serial]
fn updating_state_for_an_unknown_session_is_an_error_not_a_silent_no_op() {
    let project = Project::empty();
    let update = project.send(&serde_json::json!({"cmd": "state", "id": "no-such-session", "state": "working"}));
    let reply = update.reply_json();
    assert_eq!(reply["ok"], false);
    assert!(reply["error"].as_str().is_some());
}
