// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub adapter: PR discovery and review/approval actions (§1 collaborators,
//! §4 PR polling). Uses the `gh` GitHub REST API directly via `reqwest`
//! rather than shelling out to the `gh` CLI, so the daemon has no external
//! binary dependency beyond `git`.

use async_trait::async_trait;
use attn_core::{Pr, PrId, PrStatus};
use serde::Deserialize;
use std::time::SystemTime;
use thiserror::Error;

const API_BASE: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("github api error: {0}")]
    Api(String),
    #[error("missing ATTN_GITHUB_TOKEN")]
    MissingToken,
}

/// Adapter over GitHub's REST API for the PRs a session's repo cares about.
#[async_trait]
pub trait GitHubAdapter: Send + Sync + 'static {
    /// Fetch all open PRs authored by the authenticated user across watched repos.
    async fn fetch_all(&self, repos: &[String]) -> Result<Vec<Pr>, GitHubError>;
    async fn fetch_pr_details(&self, repo: &str, number: u64) -> Result<Pr, GitHubError>;
    async fn approve(&self, repo: &str, number: u64) -> Result<(), GitHubError>;
}

/// Real adapter backed by `reqwest` and a personal access token.
#[derive(Clone)]
pub struct ReqwestGitHubAdapter {
    client: reqwest::Client,
    token: String,
}

impl ReqwestGitHubAdapter {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Build from the `ATTN_GITHUB_TOKEN` environment variable.
    pub fn from_env() -> Result<Self, GitHubError> {
        let token = std::env::var("ATTN_GITHUB_TOKEN").map_err(|_| GitHubError::MissingToken)?;
        Ok(Self::new(token))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "attn-daemon")
            .header("Accept", "application/vnd.github+json")
    }
}

#[derive(Debug, Deserialize)]
struct GhPullRequest {
    number: u64,
    title: String,
    html_url: String,
    user: GhUser,
    head: GhRef,
    base: GhRef,
    state: String,
    draft: Option<bool>,
    merged_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    r#ref: String,
}

fn map_status(pr: &GhPullRequest) -> PrStatus {
    if pr.merged_at.is_some() {
        PrStatus::Merged
    } else if pr.state == "closed" {
        PrStatus::Closed
    } else {
        PrStatus::Open
    }
}

fn to_pr(repo: &str, pr: GhPullRequest, now: SystemTime) -> Pr {
    let status = map_status(&pr);
    Pr {
        id: PrId::new(repo, pr.number),
        repo: repo.to_string(),
        number: pr.number,
        title: pr.title,
        url: pr.html_url,
        author: pr.user.login,
        head_branch: pr.head.r#ref,
        base_branch: pr.base.r#ref,
        status,
        checks_status: None,
        fetched_at: now,
        muted: false,
    }
}

#[async_trait]
impl GitHubAdapter for ReqwestGitHubAdapter {
    async fn fetch_all(&self, repos: &[String]) -> Result<Vec<Pr>, GitHubError> {
        let mut out = Vec::new();
        for repo in repos {
            let url = format!("{API_BASE}/repos/{repo}/pulls?state=open");
            let resp = self.request(reqwest::Method::GET, &url).send().await?;
            if !resp.status().is_success() {
                return Err(GitHubError::Api(format!(
                    "GET {url}: {}",
                    resp.status()
                )));
            }
            let prs: Vec<GhPullRequest> = resp.json().await?;
            let now = SystemTime::now();
            out.extend(prs.into_iter().map(|p| to_pr(repo, p, now)));
        }
        Ok(out)
    }

    async fn fetch_pr_details(&self, repo: &str, number: u64) -> Result<Pr, GitHubError> {
        let url = format!("{API_BASE}/repos/{repo}/pulls/{number}");
        let resp = self.request(reqwest::Method::GET, &url).send().await?;
        if !resp.status().is_success() {
            return Err(GitHubError::Api(format!("GET {url}: {}", resp.status())));
        }
        let pr: GhPullRequest = resp.json().await?;
        Ok(to_pr(repo, pr, SystemTime::now()))
    }

    async fn approve(&self, repo: &str, number: u64) -> Result<(), GitHubError> {
        let url = format!("{API_BASE}/repos/{repo}/pulls/{number}/reviews");
        let body = serde_json::json!({ "event": "APPROVE" });
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(GitHubError::Api(format!("POST {url}: {}", resp.status())));
        }
        Ok(())
    }
}

/// Stand-in adapter used when no GitHub token is configured: every call
/// fails with [`GitHubError::MissingToken`] rather than the daemon
/// refusing to start. PR-related commands surface that error to the
/// caller exactly as any other `External` failure would (§7).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpGitHubAdapter;

#[async_trait]
impl GitHubAdapter for NoOpGitHubAdapter {
    async fn fetch_all(&self, _repos: &[String]) -> Result<Vec<Pr>, GitHubError> {
        Err(GitHubError::MissingToken)
    }

    async fn fetch_pr_details(&self, _repo: &str, _number: u64) -> Result<Pr, GitHubError> {
        Err(GitHubError::MissingToken)
    }

    async fn approve(&self, _repo: &str, _number: u64) -> Result<(), GitHubError> {
        Err(GitHubError::MissingToken)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGitHubAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Scripted `GitHubAdapter` for deterministic testing.
    #[derive(Clone, Default)]
    pub struct FakeGitHubAdapter {
        inner: Arc<Mutex<State>>,
    }

    #[derive(Default)]
    struct State {
        prs: Vec<Pr>,
        approved: Vec<(String, u64)>,
    }

    impl FakeGitHubAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, prs: Vec<Pr>) {
            self.inner.lock().prs = prs;
        }

        pub fn approved_calls(&self) -> Vec<(String, u64)> {
            self.inner.lock().approved.clone()
        }
    }

    #[async_trait]
    impl GitHubAdapter for FakeGitHubAdapter {
        async fn fetch_all(&self, _repos: &[String]) -> Result<Vec<Pr>, GitHubError> {
            Ok(self.inner.lock().prs.clone())
        }

        async fn fetch_pr_details(&self, repo: &str, number: u64) -> Result<Pr, GitHubError> {
            self.inner
                .lock()
                .prs
                .iter()
                .find(|p| p.repo == repo && p.number == number)
                .cloned()
                .ok_or_else(|| GitHubError::Api(format!("no such pr: {repo}#{number}")))
        }

        async fn approve(&self, repo: &str, number: u64) -> Result<(), GitHubError> {
            self.inner.lock().approved.push((repo.to_string(), number));
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
