// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn status_reports_not_running_before_anything_starts() {
    let project = Project::empty();
    project.attn().args(&["status"]).passes().stdout_has("not running");
}

#[test]
#[serial]
fn start_brings_up_the_daemon_and_status_then_sees_it() {
    let project = Project::empty();
    project.attn().args(&["start"]).passes().stdout_has("attnd ready");

    let reachable = wait_for(SPEC_WAIT_MAX_MS, || {
        project.attn().args(&["status"]).command().stdout().contains("reachable")
    });
    assert!(reachable, "daemon never became reachable after start");
}

#[test]
#[serial]
fn starting_twice_is_idempotent() {
    let project = Project::empty();
    project.attn().args(&["start"]).passes();
    project.attn().args(&["start"]).passes().stdout_has("attnd ready");
}

#[test]
#[serial]
fn stop_tears_down_a_running_daemon() {
    let project = Project::empty();
    project.attn().args(&["start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || project.attn().args(&["status"]).command().stdout().contains("reachable"));

    project.attn().args(&["stop"]).passes().stdout_has("attnd stopped");

    let socket_gone = wait_for(SPEC_WAIT_MAX_MS, || !project.state_path().join("daemon.sock").exists());
    assert!(socket_gone, "socket file should be cleaned up once the daemon exits");
}

#[test]
#[serial]
fn stop_without_a_running_daemon_says_so_instead_of_failing() {
    let project = Project::empty();
    project.attn().args(&["stop"]).passes().stdout_has("was not running");
}

#[test]
#[serial]
fn send_auto_starts_the_daemon_on_first_use() {
    let project = Project::empty();
    let run = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    assert!(run.success());
    let reply = run.reply_json();
    assert_eq!(reply["ok"], true);
}
