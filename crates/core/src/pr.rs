// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pull-request cache entity (§3 Data model).
//!
//! PRs are not owned by this daemon; they are a cached mirror of whatever
//! the GitHub collaborator last reported, refreshed on a fixed poll interval
//! and on demand when staleness is detected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// How long a cached PR is trusted before the orchestrator refetches it.
pub const PR_REFRESH_TTL: Duration = Duration::from_secs(90);

/// Composite identifier `<repo>#<number>`, e.g. `acme/widgets#42`.
///
/// Unlike the other ids in this crate, a `PrId` is derived rather than
/// opaque: it is always reconstructible from `(repo, number)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrId(String);

impl PrId {
    pub fn new(repo: &str, number: u64) -> Self {
        Self(format!("{repo}#{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(repo, number)`, if this id is well-formed.
    pub fn parse(&self) -> Option<(&str, u64)> {
        let (repo, number) = self.0.rsplit_once('#')?;
        Some((repo, number.parse().ok()?))
    }
}

impl fmt::Display for PrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a pull request, mirroring the GitHub collaborator's
/// vocabulary rather than inventing a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    Open,
    Closed,
    Merged,
}

/// Cached view of one pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pr {
    pub id: PrId,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub head_branch: String,
    pub base_branch: String,
    pub status: PrStatus,
    #[serde(default)]
    pub checks_status: Option<String>,
    #[serde(with = "crate::rfc3339")]
    pub fetched_at: SystemTime,
    #[serde(default)]
    pub muted: bool,
}

impl Pr {
    /// True once `fetched_at` is older than [`PR_REFRESH_TTL`].
    pub fn needs_refresh(&self, now: SystemTime) -> bool {
        match now.duration_since(self.fetched_at) {
            Ok(age) => age >= PR_REFRESH_TTL,
            Err(_) => false,
        }
    }

    pub fn refresh(&mut self, status: PrStatus, checks_status: Option<String>, now: SystemTime) {
        self.status = status;
        self.checks_status = checks_status;
        self.fetched_at = now;
    }
}

#[cfg(test)]
#[path = "pr_tests.rs"]
mod tests;
