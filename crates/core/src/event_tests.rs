// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::agent::AgentKind;

#[test]
fn command_tag_round_trips() {
    let cmd = Command::State {
        id: SessionId::new("sess-1"),
        state: SessionState::Working,
    };
    let json = serde_json::to_value(&cmd).unwrap();
    assert_eq!(json["cmd"], "state");
    let back: Command = serde_json::from_value(json).unwrap();
    assert_eq!(back.name(), "state");
}

#[test]
fn unrecognized_cmd_fails_to_deserialize() {
    let raw = serde_json::json!({ "cmd": "not_a_real_command" });
    let result: Result<Command, _> = serde_json::from_value(raw);
    assert!(result.is_err());
}

#[test]
fn query_prs_has_no_payload_fields() {
    let json = serde_json::to_value(&Command::QueryPrs).unwrap();
    assert_eq!(json, serde_json::json!({ "cmd": "query_prs" }));
}

#[test]
fn mutating_commands_are_async_on_websocket() {
    let cmd = Command::CreateWorktreeFromBranch {
        main_repo: PathBuf::from("/repo"),
        branch: "main".to_string(),
    };
    assert!(cmd.is_async_on_websocket());
    assert!(!Command::Query { filter: String::new() }.is_async_on_websocket());
}

#[test]
fn event_tag_round_trips() {
    let event = Event::SessionStateChanged {
        id: SessionId::new("sess-1"),
        state: SessionState::Idle,
        state_updated_at: "2026-07-30T00:00:00.000Z".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "session_state_changed");
    assert_eq!(event.name(), "session_state_changed");
}

#[test]
fn session_id_extracts_relevant_events_only() {
    let id = SessionId::new("sess-1");
    let changed = Event::SessionStateChanged {
        id: id.clone(),
        state: SessionState::Idle,
        state_updated_at: "2026-07-30T00:00:00.000Z".to_string(),
    };
    assert_eq!(changed.session_id(), Some(&id));

    let pr_event = Event::PrActionResult {
        success: true,
        error: None,
    };
    assert_eq!(pr_event.session_id(), None);
}

#[test]
fn sessions_updated_event_carries_full_session_list() {
    let session = crate::session::Session::new(
        SessionId::new("sess-1"),
        "drumstick".into(),
        AgentKind::Claude,
        PathBuf::from("/tmp"),
        std::time::SystemTime::UNIX_EPOCH,
    );
    let event = Event::SessionsUpdated {
        sessions: vec![session],
    };
    assert_eq!(event.name(), "sessions_updated");
}

#[test]
fn socket_reply_err_omits_optional_fields() {
    let reply = SocketReply::err("session not found");
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "ok": false, "error": "session not found" })
    );
}

#[test]
fn socket_reply_sessions_sets_ok_true() {
    let reply = SocketReply::sessions(vec![]);
    assert!(reply.ok);
    assert!(reply.sessions.is_some());
}
