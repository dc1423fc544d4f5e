// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn help_lists_every_subcommand() {
    let project = Project::empty();
    let run = project.attn().args(&["--help"]).passes();
    run.stdout_has("start").stdout_has("stop").stdout_has("status").stdout_has("send");
}

#[test]
fn version_prints_something() {
    let project = Project::empty();
    project.attn().args(&["--version"]).passes().stdout_has("attn");
}

#[test]
fn an_unknown_subcommand_fails_with_a_nonzero_exit_code() {
    let project = Project::empty();
    let run = project.attn().args(&["frobnicate"]).fails();
    assert_ne!(run.code(), Some(0));
}

#[test]
fn send_with_invalid_json_fails_instead_of_silently_starting_the_daemon() {
    let project = Project::empty();
    project.attn().args(&["send", "{not json"]).fails();
    assert!(!project.state_path().join("daemon.sock").exists(), "malformed input should be rejected before dialing the daemon");
}
