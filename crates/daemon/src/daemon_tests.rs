// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use attn_adapters::{FakeClassifier, FakeGitAdapter, FakeGitHubAdapter, NoOpPtyAdapter};
use attn_core::{Pr, PrId, PrStatus};
use std::path::PathBuf;
use std::time::SystemTime;
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        socket_path: dir.join("daemon.sock"),
        lock_path: dir.join("daemon.lock"),
        daemon_id_path: dir.join("daemon.id"),
        snapshot_path: dir.join("state.json"),
        log_path: dir.join("daemon.log"),
    }
}

fn daemon_in(dir: &std::path::Path) -> Daemon {
    let git: Arc<dyn GitAdapter> = Arc::new(FakeGitAdapter::new());
    let github: Arc<dyn GitHubAdapter> = Arc::new(FakeGitHubAdapter::new());
    let pty: Arc<dyn PtyAdapter> = Arc::new(NoOpPtyAdapter);
    let classifier: Arc<dyn attn_adapters::Classifier> = Arc::new(FakeClassifier::new());
    let reviewer: Arc<dyn attn_adapters::Reviewer> =
        Arc::new(attn_adapters::ScriptReviewer::new(PathBuf::from("/bin/true")));
    Daemon::new(config_in(dir), git, github, pty, classifier, reviewer)
}

#[test]
fn watched_repos_collects_pr_repos_and_settings_repos() {
    let dir = tempdir().expect("tempdir");
    let daemon = daemon_in(dir.path());
    daemon.store.upsert_pr(Pr {
        id: PrId::new("acme/widgets", 1),
        repo: "acme/widgets".to_string(),
        number: 1,
        title: "t".to_string(),
        url: "https://example.com".to_string(),
        author: "octocat".to_string(),
        head_branch: "feature".to_string(),
        base_branch: "main".to_string(),
        status: PrStatus::Open,
        checks_status: None,
        fetched_at: SystemTime::now(),
        muted: false,
    });
    daemon.store.set_repo_muted("acme/gizmos", true);

    let repos = watched_repos(&daemon.store);
    assert_eq!(repos, vec!["acme/gizmos".to_string(), "acme/widgets".to_string()]);
}

#[tokio::test]
async fn stop_persists_a_snapshot_and_stops_watchers() {
    let dir = tempdir().expect("tempdir");
    let daemon = daemon_in(dir.path());
    daemon.router.store.add_session(attn_core::Session::new(
        attn_core::SessionId::new("sess-1"),
        "demo".to_string(),
        attn_core::AgentKind::Claude,
        PathBuf::from("/repo/main"),
        SystemTime::now(),
    ));

    daemon.stop().await;

    assert!(dir.path().join("state.json").exists());
}
