// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Review entities: a driven review run and the comments it produces
//! (§3 Data model, §4.G Review driver).

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

crate::define_id! {
    /// Identifies one review run, scoped to the session that requested it.
    pub struct ReviewId;
}

crate::define_id! {
    /// Identifies a single comment within a review run.
    pub struct ReviewCommentId;
}

/// Lifecycle of a review run. A review moves forward only; once
/// `Cancelled`, `Completed`, or `Failed` it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl ReviewStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReviewStatus::Running)
    }
}

/// One comment streamed back by the reviewer collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: ReviewCommentId,
    pub review_id: ReviewId,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub body: String,
    #[serde(with = "crate::rfc3339")]
    pub created_at: SystemTime,
}

/// A review run driving a reviewer collaborator against a session's
/// working tree, accumulating comments as they stream in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub session_id: crate::session::SessionId,
    pub status: ReviewStatus,
    #[serde(with = "crate::rfc3339")]
    pub started_at: SystemTime,
    #[serde(default, with = "crate::rfc3339::option")]
    pub finished_at: Option<SystemTime>,
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
}

impl Review {
    pub fn start(id: ReviewId, session_id: crate::session::SessionId, now: SystemTime) -> Self {
        Self {
            id,
            session_id,
            status: ReviewStatus::Running,
            started_at: now,
            finished_at: None,
            comments: Vec::new(),
        }
    }

    pub fn push_comment(&mut self, comment: ReviewComment) {
        self.comments.push(comment);
    }

    /// Transition to a terminal status. No-op if already terminal, since a
    /// cancellation racing a completion must not resurrect a finished run.
    pub fn finish(&mut self, status: ReviewStatus, now: SystemTime) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.finished_at = Some(now);
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
