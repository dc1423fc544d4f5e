// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worktree / Branch Orchestrator (§4.F): git-backed worktree and branch
//! mutations, kept in sync with the registry and the per-repo branch
//! cache.

use crate::error::EngineError;
use attn_adapters::git::BranchSource;
use attn_adapters::GitAdapter;
use attn_core::event::WorktreeSource;
use attn_core::worktree::{canonical_worktree_path, strip_remote_prefix};
use attn_core::{BranchCache, BranchInfo, IdGen, UuidIdGen, Worktree};
use attn_storage::Store;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Bundle returned by `get_repo_info` (§4.F `GetRepoInfo`).
#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub current_branch: String,
    pub head_sha: String,
    pub head_subject: String,
    pub default_branch: String,
    pub worktrees: Vec<Worktree>,
    pub branches: Vec<BranchInfo>,
}

impl RepoInfo {
    /// Render as the opaque JSON payload carried by `GetRepoInfoResult`.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "current_branch": self.current_branch,
            "head_sha": self.head_sha,
            "head_subject": self.head_subject,
            "default_branch": self.default_branch,
            "worktrees": self.worktrees,
            "branches": self.branches,
        })
    }
}

fn wire_source_to_branch_source(branch_name: &str, source: Option<&WorktreeSource>) -> BranchSource {
    match source {
        None => BranchSource::StartPoint {
            branch: branch_name.to_string(),
            start_point: "HEAD".to_string(),
        },
        Some(WorktreeSource::ExistingBranch { branch }) => {
            BranchSource::ExistingBranch(branch.clone())
        }
        Some(WorktreeSource::RemoteBranch { remote_branch }) => {
            BranchSource::RemoteBranch(remote_branch.clone())
        }
        Some(WorktreeSource::StartPoint { point }) => BranchSource::StartPoint {
            branch: branch_name.to_string(),
            start_point: point.clone(),
        },
    }
}

fn branch_name_for(branch_name: Option<&str>, source: Option<&WorktreeSource>) -> String {
    if let Some(name) = branch_name {
        return name.to_string();
    }
    match source {
        Some(WorktreeSource::ExistingBranch { branch }) => branch.clone(),
        Some(WorktreeSource::RemoteBranch { remote_branch }) => {
            strip_remote_prefix(remote_branch).to_string()
        }
        Some(WorktreeSource::StartPoint { .. }) | None => {
            format!("attn-{}", UuidIdGen.next())
        }
    }
}

/// List worktrees for `main_repo`, reconciling the registry with git
/// ground truth first (§4.F list rule).
pub async fn list_worktrees(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
) -> Result<Vec<Worktree>, EngineError> {
    let now = SystemTime::now();
    let paths = git.list_worktrees(main_repo).await?;
    let mut ground_truth = Vec::new();
    for path in paths {
        if path == main_repo {
            continue;
        }
        let branch = git.get_current_branch(&path).await.unwrap_or_default();
        ground_truth.push(Worktree::new(path, branch, main_repo.to_path_buf(), now));
    }
    store.reconcile_worktrees(main_repo, ground_truth, now);
    Ok(store.list_worktrees(main_repo))
}

/// Create a worktree for `main_repo`, optionally at an explicit `path`
/// and/or branched from `source` (§4.F create rule). Invalidates the
/// branch cache on success.
pub async fn create_worktree(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
    path: Option<PathBuf>,
    branch: Option<&str>,
    source: Option<&WorktreeSource>,
) -> Result<Worktree, EngineError> {
    let resolved_main_repo = git
        .get_main_repo_from_worktree(main_repo)
        .await
        .unwrap_or_else(|_| main_repo.to_path_buf());

    let branch_name = branch_name_for(branch, source);
    let target_path = path.unwrap_or_else(|| canonical_worktree_path(&resolved_main_repo, &branch_name));

    let branch_source = wire_source_to_branch_source(&branch_name, source);
    git.create_worktree(&resolved_main_repo, &target_path, branch_source)
        .await?;

    let now = SystemTime::now();
    let worktree = Worktree::new(target_path, branch_name, resolved_main_repo.clone(), now);
    store.add_worktree(worktree.clone());
    store.invalidate_branch_cache(&resolved_main_repo);
    Ok(worktree)
}

/// Delete the worktree at `path` (§4.F delete rule). Any session rooted
/// there is unregistered first (real signal delivery requires a PTY
/// adapter this daemon does not implement; §1 Non-goals). Already-gone
/// worktrees are treated as a successful no-op.
pub async fn delete_worktree(
    store: &Store,
    git: &dyn GitAdapter,
    path: &Path,
) -> Result<(), EngineError> {
    for session in store.list_sessions_in_directory(path) {
        store.remove_session(&session.id);
    }

    let existing = store.get_worktree(path);
    let main_repo = match &existing {
        Some(w) => w.main_repo.clone(),
        None => match git.get_main_repo_from_worktree(path).await {
            Ok(repo) => repo,
            Err(_) if !path.exists() => return Ok(()),
            Err(err) => return Err(err.into()),
        },
    };

    match git.delete_worktree(&main_repo, path).await {
        Ok(()) => {
            store.remove_worktree(path);
            if let Some(worktree) = existing {
                if let Err(err) = git.delete_branch(&main_repo, &worktree.branch, false).await {
                    tracing::warn!(branch = %worktree.branch, error = %err, "best-effort branch delete failed");
                }
            }
            store.invalidate_branch_cache(&main_repo);
            Ok(())
        }
        Err(_) if !path.exists() => {
            store.remove_worktree(path);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// List branches for `main_repo`, invalidating nothing (read-only
/// pass-through, §4.F branch operations).
pub async fn list_branches(git: &dyn GitAdapter, main_repo: &Path) -> Result<Vec<String>, EngineError> {
    Ok(git.list_branches(main_repo).await?)
}

pub async fn create_branch(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
    branch: &str,
) -> Result<(), EngineError> {
    git.create_branch(main_repo, branch, None).await?;
    store.invalidate_branch_cache(main_repo);
    Ok(())
}

pub async fn delete_branch(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
    branch: &str,
    force: bool,
) -> Result<(), EngineError> {
    git.delete_branch(main_repo, branch, force).await?;
    store.invalidate_branch_cache(main_repo);
    Ok(())
}

pub async fn switch_branch(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
    branch: &str,
) -> Result<(), EngineError> {
    git.switch_branch(main_repo, branch).await?;
    store.invalidate_branch_cache(main_repo);
    Ok(())
}

/// Bundle repo info for `main_repo` (§4.F `GetRepoInfo`), using the branch
/// cache when fresh (<30 min) and refreshing it otherwise.
pub async fn get_repo_info(
    store: &Store,
    git: &dyn GitAdapter,
    main_repo: &Path,
) -> Result<RepoInfo, EngineError> {
    let now = SystemTime::now();
    let current_branch = git.get_current_branch(main_repo).await?;
    let head = git.get_head_commit_info(main_repo).await?;
    let default_branch = git
        .get_default_branch(main_repo)
        .await
        .unwrap_or_else(|_| "main".to_string());
    let worktrees = list_worktrees(store, git, main_repo).await?;

    let branches = match store.get_branch_cache(main_repo) {
        Some(cache) if cache.is_fresh(now) => cache.branches,
        _ => {
            let annotated = git.list_branches_with_commits(main_repo).await?;
            let branches: Vec<BranchInfo> = annotated
                .into_iter()
                .map(|(name, commit)| BranchInfo {
                    name,
                    commit: Some(commit.sha),
                })
                .collect();
            store.set_branch_cache(main_repo.to_path_buf(), BranchCache::new(branches.clone(), now));
            branches
        }
    };

    Ok(RepoInfo {
        current_branch,
        head_sha: head.sha,
        head_subject: head.subject,
        default_branch,
        worktrees,
        branches,
    })
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
