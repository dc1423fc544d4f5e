// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine components.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("worktree not found: {0}")]
    WorktreeNotFound(String),
    #[error("review not found: {0}")]
    ReviewNotFound(String),
    #[error(transparent)]
    Git(#[from] attn_adapters::GitError),
    #[error(transparent)]
    GitHub(#[from] attn_adapters::GitHubError),
    #[error(transparent)]
    Classifier(#[from] attn_adapters::ClassifierError),
    #[error(transparent)]
    Reviewer(#[from] attn_adapters::ReviewerError),
}
