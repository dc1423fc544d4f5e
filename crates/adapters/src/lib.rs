// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! attn-adapters: gateways to the outside world — git, GitHub, the
//! classifier collaborator, the reviewer sub-process, chat platforms, and
//! per-agent capability descriptors (§4.C/§4.D policy data; §1 collaborators).

pub mod agent;
pub mod chat;
pub mod classifier;
mod env;
pub mod git;
pub mod github;
pub mod pty;
pub mod reviewer;
pub mod subprocess;

pub use agent::{
    behavior_for, AgentBehavior, ClaudeBehavior, CodexBehavior, CopilotBehavior, LineOutcome, TickOutcome,
};
pub use chat::{ChatAdapter, ChatError, NoOpChatAdapter};
pub use classifier::{Classifier, ClassifierError, ScriptClassifier};
pub use git::{CliGitAdapter, GitAdapter, GitError};
pub use github::{GitHubAdapter, GitHubError, NoOpGitHubAdapter, ReqwestGitHubAdapter};
pub use pty::{NoOpPtyAdapter, PtyAdapter, PtyError};
pub use reviewer::{Reviewer, ReviewerError, ReviewerHandle, ScriptReviewer};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use classifier::FakeClassifier;
#[cfg(any(test, feature = "test-support"))]
pub use git::FakeGitAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use github::FakeGitHubAdapter;
