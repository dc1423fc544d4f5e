// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worktree entity and the per-repo branch cache (§3 Data model).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// TTL for a repo's cached branch listing.
pub const BRANCH_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// An auxiliary git checkout anchored to a main working copy.
///
/// Identified by `path`; uniqueness is enforced by the store, not this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    pub branch: String,
    pub main_repo: PathBuf,
    #[serde(with = "crate::rfc3339")]
    pub created_at: SystemTime,
}

impl Worktree {
    pub fn new(path: PathBuf, branch: String, main_repo: PathBuf, created_at: SystemTime) -> Self {
        Self {
            path,
            branch,
            main_repo,
            created_at,
        }
    }
}

/// A single branch entry, optionally annotated with its tip commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Cached branch listing for one main repo (§3 Branch cache).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCache {
    #[serde(with = "crate::rfc3339")]
    pub fetched_at: SystemTime,
    pub branches: Vec<BranchInfo>,
}

impl BranchCache {
    pub fn new(branches: Vec<BranchInfo>, now: SystemTime) -> Self {
        Self {
            fetched_at: now,
            branches,
        }
    }

    /// Fresh iff `now - fetched_at < 30 minutes`. A cache whose `fetched_at`
    /// is in the future (clock skew) is treated as fresh rather than erroring.
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        match now.duration_since(self.fetched_at) {
            Ok(age) => age < BRANCH_CACHE_TTL,
            Err(_) => true,
        }
    }
}

/// Slugify a branch name into a filesystem-safe path component:
/// `/` becomes `-`, and any character unsafe for a path component is
/// stripped. Per spec.md §9 Open Questions, characters beyond `/` are
/// unspecified upstream; this implementation additionally strips
/// whitespace and shell-metacharacters so the generated path is always
/// a valid single component.
pub fn slugify_branch(branch: &str) -> String {
    branch
        .chars()
        .map(|c| if c == '/' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect()
}

/// Generate the canonical worktree path for a main repo + branch, per
/// §4.F: `<basename(main_repo)>--<slugified(branch)>`, placed as a sibling
/// of `main_repo`.
pub fn canonical_worktree_path(main_repo: &Path, branch: &str) -> PathBuf {
    let base = main_repo
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let sibling = main_repo.parent().unwrap_or(main_repo);
    sibling.join(format!("{base}--{}", slugify_branch(branch)))
}

/// Strip a leading `origin/` (or other `<remote>/`) prefix from a
/// remote-tracking branch name, per §4.F local-branch naming rule.
pub fn strip_remote_prefix(remote_branch: &str) -> &str {
    remote_branch
        .split_once('/')
        .map(|(_, rest)| rest)
        .unwrap_or(remote_branch)
}

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
