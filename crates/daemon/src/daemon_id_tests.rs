// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn creates_a_fresh_id_when_file_absent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.id");
    let id = ensure_daemon_id(&path).unwrap();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), id);
}

#[test]
fn reuses_an_existing_valid_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.id");
    let first = ensure_daemon_id(&path).unwrap();
    let second = ensure_daemon_id(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn regenerates_a_malformed_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.id");
    std::fs::write(&path, "not-a-uuid\n").unwrap();
    let id = ensure_daemon_id(&path).unwrap();
    assert!(Uuid::parse_str(&id).is_ok());
}

#[test]
fn converges_when_the_file_appears_between_read_and_create() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daemon.id");
    let winner = Uuid::new_v4().to_string();
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .unwrap()
        .write_all(format!("{winner}\n").as_bytes())
        .unwrap();
    let observed = ensure_daemon_id(&path).unwrap();
    assert_eq!(observed, winner);
}
