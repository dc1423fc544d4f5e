// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reviewer collaborator: drives a streaming code review and reports
//! progress as it happens (§4.G Review Driver). The driver in
//! `attn-engine` owns the cancellation-handle bookkeeping and the
//! `review_id -> handle` map; this module only runs one review.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ReviewerError {
    #[error("failed to start reviewer: {0}")]
    SpawnFailed(String),
    #[error("reviewer exited with failure: {0}")]
    Failed(String),
}

/// One chunk of reviewer output, forwarded to the review driver as it
/// streams in. Mirrors the subset of `attn_core::Event::Review*` variants
/// this collaborator can produce, kept decoupled from the wire enum.
#[derive(Debug, Clone)]
pub enum ReviewProgress {
    Chunk(String),
    Finding { file: String, line: Option<u32>, body: String },
    ToolUse { tool: String },
    Resolved { comment_id: String },
    Complete,
    Failed(String),
}

/// Handle to a running review: cancel it by dropping or calling `cancel()`.
pub struct ReviewerHandle {
    child: Child,
}

impl ReviewerHandle {
    /// Terminate the reviewer sub-process.
    pub async fn cancel(mut self) {
        let _ = self.child.kill().await;
    }
}

/// Collaborator that drives a streaming code review.
#[async_trait]
pub trait Reviewer: Send + Sync + 'static {
    /// Start a review of `base_branch..HEAD` in `worktree`, streaming
    /// progress on `progress_tx` until the channel is dropped or the
    /// review completes. Returns a handle the caller can cancel.
    async fn start(
        &self,
        worktree: &std::path::Path,
        base_branch: &str,
        progress_tx: mpsc::Sender<ReviewProgress>,
    ) -> Result<ReviewerHandle, ReviewerError>;
}

/// Real reviewer: spawns an external script that emits one JSON object per
/// line on stdout (`{"type":"chunk"|"finding"|"tool_use"|"resolved","...":...}`,
/// terminated by `{"type":"complete"}` or `{"type":"failed","error":...}`).
#[derive(Clone, Debug)]
pub struct ScriptReviewer {
    script_path: PathBuf,
}

impl ScriptReviewer {
    pub fn new(script_path: PathBuf) -> Self {
        Self { script_path }
    }
}

fn parse_line(line: &str) -> Option<ReviewProgress> {
    let json: serde_json::Value = serde_json::from_str(line).ok()?;
    match json.get("type").and_then(|v| v.as_str())? {
        "chunk" => Some(ReviewProgress::Chunk(
            json.get("text")?.as_str()?.to_string(),
        )),
        "finding" => Some(ReviewProgress::Finding {
            file: json.get("file")?.as_str()?.to_string(),
            line: json.get("line").and_then(|v| v.as_u64()).map(|n| n as u32),
            body: json.get("body")?.as_str()?.to_string(),
        }),
        "tool_use" => Some(ReviewProgress::ToolUse {
            tool: json.get("tool")?.as_str()?.to_string(),
        }),
        "resolved" => Some(ReviewProgress::Resolved {
            comment_id: json.get("comment_id")?.as_str()?.to_string(),
        }),
        "complete" => Some(ReviewProgress::Complete),
        "failed" => Some(ReviewProgress::Failed(
            json.get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error")
                .to_string(),
        )),
        _ => None,
    }
}

#[async_trait]
impl Reviewer for ScriptReviewer {
    async fn start(
        &self,
        worktree: &std::path::Path,
        base_branch: &str,
        progress_tx: mpsc::Sender<ReviewProgress>,
    ) -> Result<ReviewerHandle, ReviewerError> {
        let mut cmd = Command::new(&self.script_path);
        cmd.arg(base_branch)
            .current_dir(worktree)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ReviewerError::SpawnFailed(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReviewerError::SpawnFailed("no stdout".to_string()))?;

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(progress) = parse_line(&line) {
                            if progress_tx.send(progress).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = progress_tx
                            .send(ReviewProgress::Failed(e.to_string()))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(ReviewerHandle { child })
    }
}

#[cfg(test)]
#[path = "reviewer_tests.rs"]
mod tests;
