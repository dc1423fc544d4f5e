// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn t(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

#[test]
fn branch_cache_fresh_within_ttl() {
    let cache = BranchCache::new(vec![], t(0));
    assert!(cache.is_fresh(t(0)));
    assert!(cache.is_fresh(t(29 * 60)));
}

#[test]
fn branch_cache_stale_past_ttl() {
    let cache = BranchCache::new(vec![], t(0));
    assert!(!cache.is_fresh(t(30 * 60)));
    assert!(!cache.is_fresh(t(60 * 60)));
}

#[test]
fn slugify_replaces_slash_and_strips_unsafe_chars() {
    assert_eq!(slugify_branch("feature/my-thing"), "feature-my-thing");
    assert_eq!(slugify_branch("fix/#123 quick!"), "fix-123quick");
}

#[test]
fn canonical_worktree_path_is_sibling_with_double_dash() {
    let p = canonical_worktree_path(Path::new("/home/user/project"), "feature/foo");
    assert_eq!(p, PathBuf::from("/home/user/project--feature-foo"));
}

#[test]
fn strip_remote_prefix_removes_leading_remote_name() {
    assert_eq!(strip_remote_prefix("origin/main"), "main");
    assert_eq!(strip_remote_prefix("main"), "main");
}
