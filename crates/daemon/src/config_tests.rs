// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn load_derives_every_path_under_state_dir() {
    let dir = tempdir().unwrap();
    std::env::set_var("ATTN_STATE_DIR", dir.path());
    let config = Config::load().unwrap();
    assert_eq!(config.state_dir, dir.path());
    assert_eq!(config.socket_path, dir.path().join("daemon.sock"));
    assert_eq!(config.daemon_id_path, dir.path().join("daemon.id"));
    assert_eq!(config.snapshot_path, dir.path().join("state.json"));
    std::env::remove_var("ATTN_STATE_DIR");
}

#[test]
#[serial]
fn load_creates_state_dir_if_missing() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("nested").join("state");
    std::env::set_var("ATTN_STATE_DIR", &nested);
    Config::load().unwrap();
    assert!(nested.is_dir());
    std::env::remove_var("ATTN_STATE_DIR");
}
