// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory registry of sessions, worktrees, PRs, review comments, and
//! chat subscriptions, with coarse reader/writer exclusion (§4.A, §5).

use attn_core::{
    BranchCache, Pr, PrId, Review, ReviewId, Session, SessionId, SessionState, Subscription,
    SubscriptionKey, Worktree,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The materialized registry snapshotted to disk (§4.A persistence).
///
/// Insertion order is preserved via parallel `Vec<Id>` order lists so that
/// `list` can return a stable order without relying on `HashMap` iteration
/// order, which is unspecified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    pub sessions: HashMap<SessionId, Session>,
    pub session_order: Vec<SessionId>,
    pub worktrees: HashMap<PathBuf, Worktree>,
    pub branch_cache: HashMap<PathBuf, BranchCache>,
    pub prs: HashMap<PrId, Pr>,
    pub reviews: HashMap<ReviewId, Review>,
    /// `(key, subscription)` pairs rather than a map, since `SubscriptionKey`
    /// is a struct and JSON object keys must be strings.
    pub subscriptions: Vec<(SubscriptionKey, Subscription)>,
    /// Per-repo mute/collapse flags for the PR sidebar (§4.H `MuteRepo`,
    /// `CollapseRepo`). Absent entries default to unmuted, expanded.
    #[serde(default)]
    pub repo_settings: HashMap<String, RepoSettings>,
}

/// Display preferences for one repo's PRs, keyed by `owner/name`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RepoSettings {
    pub muted: bool,
    pub collapsed: bool,
}

/// Thread-safe facade over [`Registry`]. All mutations take the writer
/// lock; all reads return deep copies so callers may never observe (or
/// corrupt) live internal state (§4.A, §5).
#[derive(Default)]
pub struct Store {
    inner: RwLock<Registry>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self {
            inner: RwLock::new(registry),
        }
    }

    /// Deep copy of the whole registry, for snapshotting.
    pub fn snapshot(&self) -> Registry {
        self.inner.read().clone()
    }

    // -- sessions ---------------------------------------------------

    pub fn add_session(&self, session: Session) {
        let mut reg = self.inner.write();
        if !reg.sessions.contains_key(&session.id) {
            reg.session_order.push(session.id.clone());
        }
        reg.sessions.insert(session.id.clone(), session);
    }

    pub fn get_session(&self, id: &SessionId) -> Option<Session> {
        self.inner.read().sessions.get(id).cloned()
    }

    pub fn remove_session(&self, id: &SessionId) -> Option<Session> {
        let mut reg = self.inner.write();
        reg.session_order.retain(|sid| sid != id);
        reg.sessions.remove(id)
    }

    /// Sessions in insertion order, optionally filtered by state (an empty
    /// filter string matches every session, per §8 scenario 1/2).
    pub fn list_sessions(&self, filter: &str) -> Vec<Session> {
        let reg = self.inner.read();
        reg.session_order
            .iter()
            .filter_map(|id| reg.sessions.get(id))
            .filter(|s| filter.is_empty() || s.state.to_string() == filter)
            .cloned()
            .collect()
    }

    pub fn list_sessions_in_directory(&self, directory: &Path) -> Vec<Session> {
        let reg = self.inner.read();
        reg.session_order
            .iter()
            .filter_map(|id| reg.sessions.get(id))
            .filter(|s| s.directory == directory)
            .cloned()
            .collect()
    }

    /// Apply `update_state` semantics (§4.A): no-op if absent.
    pub fn update_session_state(&self, id: &SessionId, new: SessionState, now: SystemTime) -> Option<Session> {
        let mut reg = self.inner.write();
        let session = reg.sessions.get_mut(id)?;
        session.apply_state(new, now);
        Some(session.clone())
    }

    pub fn update_session_todos(&self, id: &SessionId, todos: serde_json::Value) -> Option<Session> {
        let mut reg = self.inner.write();
        let session = reg.sessions.get_mut(id)?;
        session.todos = todos;
        Some(session.clone())
    }

    pub fn touch_session(&self, id: &SessionId, now: SystemTime) -> Option<Session> {
        let mut reg = self.inner.write();
        let session = reg.sessions.get_mut(id)?;
        session.touch(now);
        Some(session.clone())
    }

    pub fn set_session_muted(&self, id: &SessionId, muted: bool) -> Option<Session> {
        let mut reg = self.inner.write();
        let session = reg.sessions.get_mut(id)?;
        session.muted = muted;
        Some(session.clone())
    }

    // -- worktrees ----------------------------------------------------

    pub fn add_worktree(&self, worktree: Worktree) {
        self.inner.write().worktrees.insert(worktree.path.clone(), worktree);
    }

    pub fn get_worktree(&self, path: &Path) -> Option<Worktree> {
        self.inner.read().worktrees.get(path).cloned()
    }

    pub fn remove_worktree(&self, path: &Path) -> Option<Worktree> {
        self.inner.write().worktrees.remove(path)
    }

    pub fn list_worktrees(&self, main_repo: &Path) -> Vec<Worktree> {
        let reg = self.inner.read();
        let mut out: Vec<Worktree> = reg
            .worktrees
            .values()
            .filter(|w| w.main_repo == main_repo)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.path.cmp(&b.path)));
        out
    }

    /// Replace the registry's worktree set for one repo with `ground_truth`,
    /// adopting entries present in git but previously unknown, and dropping
    /// entries the registry had but git no longer reports (§3, §4.F).
    pub fn reconcile_worktrees(&self, main_repo: &Path, ground_truth: Vec<Worktree>, now: SystemTime) {
        let mut reg = self.inner.write();
        reg.worktrees.retain(|path, w| w.main_repo != main_repo || ground_truth.iter().any(|g| &g.path == path));
        for mut adopted in ground_truth {
            reg.worktrees.entry(adopted.path.clone()).or_insert_with(|| {
                adopted.created_at = now;
                adopted
            });
        }
    }

    // -- branch cache ---------------------------------------------------

    pub fn get_branch_cache(&self, main_repo: &Path) -> Option<BranchCache> {
        self.inner.read().branch_cache.get(main_repo).cloned()
    }

    pub fn set_branch_cache(&self, main_repo: PathBuf, cache: BranchCache) {
        self.inner.write().branch_cache.insert(main_repo, cache);
    }

    pub fn invalidate_branch_cache(&self, main_repo: &Path) {
        self.inner.write().branch_cache.remove(main_repo);
    }

    // -- PRs ---------------------------------------------------------

    pub fn upsert_pr(&self, pr: Pr) {
        self.inner.write().prs.insert(pr.id.clone(), pr);
    }

    pub fn get_pr(&self, id: &PrId) -> Option<Pr> {
        self.inner.read().prs.get(id).cloned()
    }

    pub fn list_prs(&self) -> Vec<Pr> {
        self.inner.read().prs.values().cloned().collect()
    }

    pub fn set_pr_muted(&self, id: &PrId, muted: bool) -> Option<Pr> {
        let mut reg = self.inner.write();
        let pr = reg.prs.get_mut(id)?;
        pr.muted = muted;
        Some(pr.clone())
    }

    pub fn set_repo_muted(&self, repo: &str, muted: bool) {
        self.inner.write().repo_settings.entry(repo.to_string()).or_default().muted = muted;
    }

    pub fn set_repo_collapsed(&self, repo: &str, collapsed: bool) {
        self.inner.write().repo_settings.entry(repo.to_string()).or_default().collapsed = collapsed;
    }

    pub fn get_repo_settings(&self, repo: &str) -> RepoSettings {
        self.inner.read().repo_settings.get(repo).copied().unwrap_or_default()
    }

    pub fn repo_settings_snapshot(&self) -> HashMap<String, RepoSettings> {
        self.inner.read().repo_settings.clone()
    }

    // -- reviews ---------------------------------------------------------

    pub fn add_review(&self, review: Review) {
        self.inner.write().reviews.insert(review.id.clone(), review);
    }

    pub fn get_review(&self, id: &ReviewId) -> Option<Review> {
        self.inner.read().reviews.get(id).cloned()
    }

    pub fn update_review<F: FnOnce(&mut Review)>(&self, id: &ReviewId, f: F) -> Option<Review> {
        let mut reg = self.inner.write();
        let review = reg.reviews.get_mut(id)?;
        f(review);
        Some(review.clone())
    }

    // -- subscriptions ---------------------------------------------------------

    pub fn subscribe(&self, key: SubscriptionKey, session_id: SessionId) {
        let mut reg = self.inner.write();
        match reg.subscriptions.iter_mut().find(|(k, _)| *k == key) {
            Some((_, sub)) => {
                sub.subscribe(session_id);
            }
            None => {
                let mut sub = Subscription::default();
                sub.subscribe(session_id);
                reg.subscriptions.push((key, sub));
            }
        }
    }

    pub fn unsubscribe(&self, key: &SubscriptionKey, session_id: &SessionId) {
        let mut reg = self.inner.write();
        if let Some((_, sub)) = reg.subscriptions.iter_mut().find(|(k, _)| k == key) {
            sub.unsubscribe(session_id);
        }
        reg.subscriptions.retain(|(_, sub)| !sub.is_empty());
    }

    pub fn subscriptions_for(&self, key: &SubscriptionKey) -> Vec<SessionId> {
        self.inner
            .read()
            .subscriptions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, sub)| sub.session_ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
