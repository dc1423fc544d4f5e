// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use attn_adapters::git::FakeGitAdapter;
use attn_core::{AgentKind, Session};
use tempfile::tempdir;

#[tokio::test]
async fn list_worktrees_adopts_git_ground_truth() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let main_repo = PathBuf::from("/repo/main");
    let wt_path = PathBuf::from("/repo/main--feature");
    git.create_worktree(&main_repo, &wt_path, BranchSource::ExistingBranch("feature".into()))
        .await
        .unwrap();

    let worktrees = list_worktrees(&store, &git, &main_repo).await.unwrap();
    assert_eq!(worktrees.len(), 1);
    assert_eq!(worktrees[0].path, wt_path);
}

#[tokio::test]
async fn list_worktrees_drops_entries_git_no_longer_reports() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let main_repo = PathBuf::from("/repo/main");
    let now = SystemTime::now();
    store.add_worktree(Worktree::new(
        PathBuf::from("/repo/main--stale"),
        "stale".to_string(),
        main_repo.clone(),
        now,
    ));

    let worktrees = list_worktrees(&store, &git, &main_repo).await.unwrap();
    assert!(worktrees.is_empty());
}

#[tokio::test]
async fn create_worktree_uses_canonical_path_when_none_given() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let main_repo = PathBuf::from("/repo/main");

    let worktree = create_worktree(
        &store,
        &git,
        &main_repo,
        None,
        None,
        Some(&WorktreeSource::ExistingBranch {
            branch: "feature/x".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(worktree.path, PathBuf::from("/repo/main--feature-x"));
    assert_eq!(worktree.branch, "feature/x");
    assert!(store.get_worktree(&worktree.path).is_some());
}

#[tokio::test]
async fn create_worktree_strips_remote_prefix_for_branch_name() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let main_repo = PathBuf::from("/repo/main");

    let worktree = create_worktree(
        &store,
        &git,
        &main_repo,
        None,
        None,
        Some(&WorktreeSource::RemoteBranch {
            remote_branch: "origin/feature-y".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(worktree.branch, "feature-y");
}

#[tokio::test]
async fn delete_worktree_removes_sessions_rooted_there() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let main_repo = PathBuf::from("/repo/main");
    let wt_path = PathBuf::from("/repo/main--feature");

    store.add_worktree(Worktree::new(
        wt_path.clone(),
        "feature".to_string(),
        main_repo.clone(),
        SystemTime::now(),
    ));
    let session_id = attn_core::SessionId::new("sess-1");
    store.add_session(Session::new(
        session_id.clone(),
        "label".to_string(),
        AgentKind::Claude,
        wt_path.clone(),
        SystemTime::now(),
    ));

    delete_worktree(&store, &git, &wt_path).await.unwrap();

    assert!(store.get_session(&session_id).is_none());
    assert!(store.get_worktree(&wt_path).is_none());
}

#[tokio::test]
async fn get_repo_info_refreshes_stale_branch_cache() {
    let store = Store::new();
    let git = FakeGitAdapter::new();
    let dir = tempdir().unwrap();
    let main_repo = dir.path().to_path_buf();
    git.set_branches(&main_repo, vec!["main".to_string()]);

    let info = get_repo_info(&store, &git, &main_repo).await.unwrap();
    assert_eq!(info.current_branch, "main");
    assert_eq!(info.default_branch, "main");
    assert!(store.get_branch_cache(&main_repo).is_some());
}
