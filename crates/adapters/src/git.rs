// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git CLI adapter: the worktree/branch primitives behind §4.F.

use crate::subprocess::{run_with_timeout, GIT_TIMEOUT, GIT_WORKTREE_TIMEOUT};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("git command failed: {0}")]
    CommandFailed(String),
    #[error("not a git repository: {0}")]
    NotARepo(String),
    #[error("dirty working tree: {0}")]
    Dirty(String),
}

/// Head commit summary, as reported by `git log -1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub subject: String,
}

/// Where a newly-created worktree's branch should come from (mirrors
/// `attn_core::WorktreeSource`, kept decoupled so this crate has no
/// reverse-dependency on the wire enum's serde shape).
#[derive(Debug, Clone)]
pub enum BranchSource {
    /// Check out an existing local branch.
    ExistingBranch(String),
    /// Check out a remote-tracking branch, creating a local branch for it.
    RemoteBranch(String),
    /// Create a new branch from a start point (commit-ish).
    StartPoint { branch: String, start_point: String },
}

/// Adapter over the `git` CLI for branch and worktree operations.
#[async_trait]
pub trait GitAdapter: Send + Sync + 'static {
    async fn list_branches(&self, repo: &Path) -> Result<Vec<String>, GitError>;
    async fn list_branches_with_commits(
        &self,
        repo: &Path,
    ) -> Result<Vec<(String, CommitInfo)>, GitError>;
    async fn create_branch(&self, repo: &Path, name: &str, start_point: Option<&str>) -> Result<(), GitError>;
    async fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> Result<(), GitError>;
    async fn switch_branch(&self, repo: &Path, name: &str) -> Result<(), GitError>;
    async fn get_current_branch(&self, repo: &Path) -> Result<String, GitError>;
    async fn get_head_commit_info(&self, repo: &Path) -> Result<CommitInfo, GitError>;
    async fn get_default_branch(&self, repo: &Path) -> Result<String, GitError>;

    async fn list_worktrees(&self, repo: &Path) -> Result<Vec<PathBuf>, GitError>;
    async fn create_worktree(
        &self,
        main_repo: &Path,
        path: &Path,
        source: BranchSource,
    ) -> Result<(), GitError>;
    async fn delete_worktree(&self, main_repo: &Path, path: &Path) -> Result<(), GitError>;

    async fn is_dirty(&self, repo: &Path) -> Result<bool, GitError>;
    async fn stash(&self, repo: &Path, message: &str) -> Result<(), GitError>;
    async fn stash_pop(&self, repo: &Path) -> Result<(), GitError>;
    /// Find the most recent stash entry whose message matches `marker`, if any.
    async fn find_stash(&self, repo: &Path, marker: &str) -> Result<Option<String>, GitError>;
    async fn commit_wip(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    async fn fetch_remotes(&self, repo: &Path) -> Result<(), GitError>;
    async fn list_remote_branches(&self, repo: &Path) -> Result<Vec<String>, GitError>;

    /// Resolve a path inside a worktree (or the main repo) to the main repo's path.
    async fn get_main_repo_from_worktree(&self, worktree: &Path) -> Result<PathBuf, GitError>;
}

/// Real git CLI adapter.
#[derive(Clone, Copy, Debug, Default)]
pub struct CliGitAdapter;

impl CliGitAdapter {
    pub fn new() -> Self {
        Self
    }

    fn cmd(&self, repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(repo).args(args);
        cmd
    }

    async fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        self.run_timeout(repo, args, GIT_TIMEOUT).await
    }

    async fn run_timeout(
        &self,
        repo: &Path,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<String, GitError> {
        let description = format!("git {}", args.join(" "));
        let output = run_with_timeout(self.cmd(repo, args), timeout, &description)
            .await
            .map_err(GitError::CommandFailed)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed(format!(
                "{}: {}",
                description,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitAdapter for CliGitAdapter {
    async fn list_branches(&self, repo: &Path) -> Result<Vec<String>, GitError> {
        let out = self
            .run(repo, &["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
            .await?;
        Ok(out.lines().map(str::to_string).collect())
    }

    async fn list_branches_with_commits(
        &self,
        repo: &Path,
    ) -> Result<Vec<(String, CommitInfo)>, GitError> {
        let out = self
            .run(
                repo,
                &[
                    "for-each-ref",
                    "--format=%(refname:short)%09%(objectname)%09%(subject)",
                    "refs/heads/",
                ],
            )
            .await?;
        Ok(out
            .lines()
            .filter_map(|line| {
                let mut parts = line.splitn(3, '\t');
                let name = parts.next()?.to_string();
                let sha = parts.next()?.to_string();
                let subject = parts.next().unwrap_or("").to_string();
                Some((name, CommitInfo { sha, subject }))
            })
            .collect())
    }

    async fn create_branch(
        &self,
        repo: &Path,
        name: &str,
        start_point: Option<&str>,
    ) -> Result<(), GitError> {
        match start_point {
            Some(sp) => self.run(repo, &["branch", name, sp]).await?,
            None => self.run(repo, &["branch", name]).await?,
        };
        Ok(())
    }

    async fn delete_branch(&self, repo: &Path, name: &str, force: bool) -> Result<(), GitError> {
        let flag = if force { "-D" } else { "-d" };
        self.run(repo, &["branch", flag, name]).await?;
        Ok(())
    }

    async fn switch_branch(&self, repo: &Path, name: &str) -> Result<(), GitError> {
        self.run(repo, &["switch", name]).await?;
        Ok(())
    }

    async fn get_current_branch(&self, repo: &Path) -> Result<String, GitError> {
        self.run(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn get_head_commit_info(&self, repo: &Path) -> Result<CommitInfo, GitError> {
        let out = self
            .run(repo, &["log", "-1", "--format=%H%x09%s"])
            .await?;
        let mut parts = out.splitn(2, '\t');
        let sha = parts.next().unwrap_or_default().to_string();
        let subject = parts.next().unwrap_or_default().to_string();
        Ok(CommitInfo { sha, subject })
    }

    async fn get_default_branch(&self, repo: &Path) -> Result<String, GitError> {
        match self
            .run(repo, &["symbolic-ref", "refs/remotes/origin/HEAD"])
            .await
        {
            Ok(out) => Ok(out.rsplit('/').next().unwrap_or("main").to_string()),
            Err(_) => {
                // No remote HEAD configured; fall back to whichever of
                // main/master actually exists.
                let branches = self.list_branches(repo).await?;
                if branches.iter().any(|b| b == "main") {
                    Ok("main".to_string())
                } else {
                    Ok("master".to_string())
                }
            }
        }
    }

    async fn list_worktrees(&self, repo: &Path) -> Result<Vec<PathBuf>, GitError> {
        let out = self.run(repo, &["worktree", "list", "--porcelain"]).await?;
        Ok(out
            .lines()
            .filter_map(|line| line.strip_prefix("worktree "))
            .map(PathBuf::from)
            .collect())
    }

    async fn create_worktree(
        &self,
        main_repo: &Path,
        path: &Path,
        source: BranchSource,
    ) -> Result<(), GitError> {
        let path_str = path.to_string_lossy().to_string();
        let args: Vec<String> = match source {
            BranchSource::ExistingBranch(branch) => {
                vec!["worktree".into(), "add".into(), path_str, branch]
            }
            BranchSource::RemoteBranch(remote_branch) => {
                let local = attn_core::strip_remote_prefix(&remote_branch).to_string();
                vec![
                    "worktree".into(),
                    "add".into(),
                    "-b".into(),
                    local,
                    path_str,
                    remote_branch,
                ]
            }
            BranchSource::StartPoint { branch, start_point } => {
                vec![
                    "worktree".into(),
                    "add".into(),
                    "-b".into(),
                    branch,
                    path_str,
                    start_point,
                ]
            }
        };
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_timeout(main_repo, &arg_refs, GIT_WORKTREE_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn delete_worktree(&self, main_repo: &Path, path: &Path) -> Result<(), GitError> {
        let path_str = path.to_string_lossy();
        self.run_timeout(
            main_repo,
            &["worktree", "remove", "--force", &path_str],
            GIT_WORKTREE_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn is_dirty(&self, repo: &Path) -> Result<bool, GitError> {
        let out = self.run(repo, &["status", "--porcelain"]).await?;
        Ok(!out.is_empty())
    }

    async fn stash(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.run(repo, &["stash", "push", "-u", "-m", message]).await?;
        Ok(())
    }

    async fn stash_pop(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["stash", "pop"]).await?;
        Ok(())
    }

    async fn find_stash(&self, repo: &Path, marker: &str) -> Result<Option<String>, GitError> {
        let out = self.run(repo, &["stash", "list"]).await?;
        Ok(out.lines().find(|l| l.contains(marker)).map(str::to_string))
    }

    async fn commit_wip(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.run(repo, &["add", "-A"]).await?;
        self.run(repo, &["commit", "-m", message, "--no-verify"]).await?;
        Ok(())
    }

    async fn fetch_remotes(&self, repo: &Path) -> Result<(), GitError> {
        self.run_timeout(repo, &["fetch", "--all", "--prune"], GIT_WORKTREE_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn list_remote_branches(&self, repo: &Path) -> Result<Vec<String>, GitError> {
        let out = self
            .run(
                repo,
                &["for-each-ref", "--format=%(refname:short)", "refs/remotes/"],
            )
            .await?;
        Ok(out
            .lines()
            .filter(|l| !l.ends_with("/HEAD"))
            .map(str::to_string)
            .collect())
    }

    async fn get_main_repo_from_worktree(&self, worktree: &Path) -> Result<PathBuf, GitError> {
        let out = self
            .run(worktree, &["rev-parse", "--path-format=absolute", "--git-common-dir"])
            .await?;
        let git_dir = PathBuf::from(out);
        Ok(git_dir.parent().unwrap_or(&git_dir).to_path_buf())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGitAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Scripted `GitAdapter` for deterministic testing of callers.
    #[derive(Clone, Default)]
    pub struct FakeGitAdapter {
        inner: Arc<Mutex<State>>,
    }

    #[derive(Default)]
    struct State {
        branches: HashMap<PathBuf, Vec<String>>,
        worktrees: HashMap<PathBuf, Vec<PathBuf>>,
        dirty: HashMap<PathBuf, bool>,
    }

    impl FakeGitAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_branches(&self, repo: &Path, branches: Vec<String>) {
            self.inner.lock().branches.insert(repo.to_path_buf(), branches);
        }

        pub fn set_dirty(&self, repo: &Path, dirty: bool) {
            self.inner.lock().dirty.insert(repo.to_path_buf(), dirty);
        }
    }

    #[async_trait]
    impl GitAdapter for FakeGitAdapter {
        async fn list_branches(&self, repo: &Path) -> Result<Vec<String>, GitError> {
            Ok(self.inner.lock().branches.get(repo).cloned().unwrap_or_default())
        }

        async fn list_branches_with_commits(
            &self,
            _repo: &Path,
        ) -> Result<Vec<(String, CommitInfo)>, GitError> {
            Ok(Vec::new())
        }

        async fn create_branch(&self, _: &Path, _: &str, _: Option<&str>) -> Result<(), GitError> {
            Ok(())
        }

        async fn delete_branch(&self, _: &Path, _: &str, _: bool) -> Result<(), GitError> {
            Ok(())
        }

        async fn switch_branch(&self, _: &Path, _: &str) -> Result<(), GitError> {
            Ok(())
        }

        async fn get_current_branch(&self, _: &Path) -> Result<String, GitError> {
            Ok("main".to_string())
        }

        async fn get_head_commit_info(&self, _: &Path) -> Result<CommitInfo, GitError> {
            Ok(CommitInfo {
                sha: "0".repeat(40),
                subject: String::new(),
            })
        }

        async fn get_default_branch(&self, _: &Path) -> Result<String, GitError> {
            Ok("main".to_string())
        }

        async fn list_worktrees(&self, repo: &Path) -> Result<Vec<PathBuf>, GitError> {
            Ok(self.inner.lock().worktrees.get(repo).cloned().unwrap_or_default())
        }

        async fn create_worktree(
            &self,
            main_repo: &Path,
            path: &Path,
            _source: BranchSource,
        ) -> Result<(), GitError> {
            self.inner
                .lock()
                .worktrees
                .entry(main_repo.to_path_buf())
                .or_default()
                .push(path.to_path_buf());
            Ok(())
        }

        async fn delete_worktree(&self, main_repo: &Path, path: &Path) -> Result<(), GitError> {
            if let Some(list) = self.inner.lock().worktrees.get_mut(main_repo) {
                list.retain(|p| p != path);
            }
            Ok(())
        }

        async fn is_dirty(&self, repo: &Path) -> Result<bool, GitError> {
            Ok(self.inner.lock().dirty.get(repo).copied().unwrap_or(false))
        }

        async fn stash(&self, _: &Path, _: &str) -> Result<(), GitError> {
            Ok(())
        }

        async fn stash_pop(&self, _: &Path) -> Result<(), GitError> {
            Ok(())
        }

        async fn find_stash(&self, _: &Path, _: &str) -> Result<Option<String>, GitError> {
            Ok(None)
        }

        async fn commit_wip(&self, _: &Path, _: &str) -> Result<(), GitError> {
            Ok(())
        }

        async fn fetch_remotes(&self, _: &Path) -> Result<(), GitError> {
            Ok(())
        }

        async fn list_remote_branches(&self, _: &Path) -> Result<Vec<String>, GitError> {
            Ok(Vec::new())
        }

        async fn get_main_repo_from_worktree(&self, worktree: &Path) -> Result<PathBuf, GitError> {
            Ok(worktree.to_path_buf())
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
