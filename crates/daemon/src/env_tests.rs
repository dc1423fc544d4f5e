// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_attn_state_dir() {
    std::env::set_var("ATTN_STATE_DIR", "/tmp/attn-test-state");
    std::env::remove_var("XDG_STATE_HOME");
    assert_eq!(state_dir(), PathBuf::from("/tmp/attn-test-state"));
    std::env::remove_var("ATTN_STATE_DIR");
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg_state_home() {
    std::env::remove_var("ATTN_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(state_dir(), PathBuf::from("/tmp/xdg-state/attn"));
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn ws_port_defaults_when_unset() {
    std::env::remove_var("ATTN_WS_PORT");
    std::env::remove_var("CM_WS_PORT");
    assert_eq!(ws_port(), 9849);
}

#[test]
#[serial]
fn ws_port_honors_override() {
    std::env::remove_var("CM_WS_PORT");
    std::env::set_var("ATTN_WS_PORT", "12345");
    assert_eq!(ws_port(), 12345);
    std::env::remove_var("ATTN_WS_PORT");
}

#[test]
#[serial]
fn ws_port_falls_back_to_the_legacy_cm_ws_port_name() {
    std::env::remove_var("ATTN_WS_PORT");
    std::env::set_var("CM_WS_PORT", "54321");
    assert_eq!(ws_port(), 54321);
    std::env::remove_var("CM_WS_PORT");
}

#[test]
#[serial]
fn classifier_script_path_defaults_under_state_dir() {
    std::env::remove_var("ATTN_CLASSIFIER_SCRIPT");
    std::env::set_var("ATTN_STATE_DIR", "/tmp/attn-test-state");
    assert_eq!(classifier_script_path(), PathBuf::from("/tmp/attn-test-state/classifier.sh"));
    std::env::remove_var("ATTN_STATE_DIR");
}

#[test]
#[serial]
fn reviewer_script_path_honors_override() {
    std::env::set_var("ATTN_REVIEWER_SCRIPT", "/tmp/custom-reviewer.sh");
    assert_eq!(reviewer_script_path(), PathBuf::from("/tmp/custom-reviewer.sh"));
    std::env::remove_var("ATTN_REVIEWER_SCRIPT");
}
