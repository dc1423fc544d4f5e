// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 5: creating a worktree succeeds, a session
//! registered inside it is tracked, and deleting the worktree also
//! unregisters any session still rooted there.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn deleting_a_worktree_unregisters_sessions_rooted_in_it() {
    let project = Project::empty().git_init();
    let main_repo = project.path().to_path_buf();
    let worktree_path = project.path().parent().expect("tempdir has a parent").join("attn-specs-worktree-fixture");

    let create = project.send(&serde_json::json!({
        "cmd": "create_worktree",
        "main_repo": main_repo,
        "path": worktree_path,
        "source": null,
    }));
    assert!(create.success());
    assert_eq!(create.reply_json()["ok"], true, "create_worktree failed: {:?}", create.reply_json());
    assert!(worktree_path.join(".git").exists(), "git should have checked out a real worktree");

    let register = project.send(&serde_json::json!({
        "cmd": "register",
        "id": "sess-in-worktree",
        "label": "working in the fixture worktree",
        "agent": "claude",
        "directory": worktree_path,
    }));
    assert_eq!(register.reply_json()["ok"], true);

    let before_delete = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    assert_eq!(before_delete.reply_json()["sessions"].as_array().expect("sessions array").len(), 1);

    let delete = project.send(&serde_json::json!({"cmd": "delete_worktree", "path": worktree_path}));
    assert_eq!(delete.reply_json()["ok"], true, "delete_worktree failed: {:?}", delete.reply_json());

    let after_delete = project.send(&serde_json::json!({"cmd": "query", "filter": ""}));
    assert_eq!(
        after_delete.reply_json()["sessions"].as_array().expect("sessions array").len(),
        0,
        "the session rooted in the deleted worktree should be gone too"
    );
    assert!(!worktree_path.exists(), "git worktree remove should have deleted the checkout");
}
