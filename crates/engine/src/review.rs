// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Review Driver (§4.G): runs the reviewer collaborator against a
//! session's worktree, streaming findings into the store as they arrive.
//! Tracks one cancellation handle per in-flight review; starting a
//! review for an id that already has one cancels it first. Every step of
//! the run — `review_started`, each `review_chunk`/`review_finding`/
//! `review_tool_use`/`review_comment_resolved`, and the terminal
//! `review_complete`/`review_cancelled` — is pushed through an
//! `EventSink` so a WebSocket client watching the review sees the full
//! stream, not just the command's own synchronous reply.

use attn_adapters::{Reviewer, ReviewerHandle, ReviewProgress};
use attn_core::{Event, EventSink, IdGen, Review, ReviewComment, ReviewCommentId, ReviewId, ReviewStatus, SessionId};
use attn_storage::Store;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc;

pub struct ReviewDriver<G: IdGen + 'static> {
    store: Arc<Store>,
    reviewer: Arc<dyn Reviewer>,
    id_gen: G,
    sink: EventSink,
    handles: Mutex<HashMap<ReviewId, ReviewerHandle>>,
}

impl<G: IdGen + 'static> ReviewDriver<G> {
    pub fn new(store: Arc<Store>, reviewer: Arc<dyn Reviewer>, id_gen: G, sink: EventSink) -> Self {
        Self {
            store,
            reviewer,
            id_gen,
            sink,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Start a review of `base_branch..HEAD` in `worktree` on behalf of
    /// `session_id`, recorded under `review_id`. Any review already
    /// running under that id is cancelled first.
    pub async fn start_review(
        &self,
        review_id: ReviewId,
        session_id: SessionId,
        worktree: PathBuf,
        base_branch: String,
    ) {
        self.cancel_review(&review_id).await;

        let now = SystemTime::now();
        self.store
            .add_review(Review::start(review_id.clone(), session_id, now));

        let (progress_tx, progress_rx) = mpsc::channel(64);
        let handle = match self.reviewer.start(&worktree, &base_branch, progress_tx).await {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(review_id = %review_id, error = %err, "failed to start reviewer");
                self.store
                    .update_review(&review_id, |r| r.finish(ReviewStatus::Failed, SystemTime::now()));
                (self.sink)(Event::ReviewComplete { review_id, success: false, error: Some(err.to_string()) });
                return;
            }
        };

        self.handles.lock().insert(review_id.clone(), handle);
        (self.sink)(Event::ReviewStarted { review_id: review_id.clone() });

        let store = self.store.clone();
        let id_gen = self.id_gen.clone();
        let sink = self.sink.clone();
        tokio::spawn(drain_progress(review_id, store, id_gen, sink, progress_rx));
    }

    /// Cancel the review running under `review_id`, if any. A review that
    /// already finished (or was never started) is left untouched — and
    /// `Review::finish` is itself idempotent, so a cancel racing a
    /// `drain_progress` completion can't resurrect it.
    pub async fn cancel_review(&self, review_id: &ReviewId) {
        let handle = self.handles.lock().remove(review_id);
        if handle.is_none() {
            return;
        }
        if let Some(handle) = handle {
            handle.cancel().await;
        }
        let finished = self
            .store
            .update_review(review_id, |r| r.finish(ReviewStatus::Cancelled, SystemTime::now()));
        if let Some(review) = finished {
            if review.status == ReviewStatus::Cancelled {
                (self.sink)(Event::ReviewCancelled { review_id: review_id.clone() });
            }
        }
    }

    /// Cancel every review still in flight. Called from `Daemon::stop()`
    /// (§4.J: "Stop() ... cancels all active reviews"), where there is no
    /// originating client command to broadcast a result from — the sink
    /// is the only way a connected client learns about it.
    pub async fn cancel_all(&self) {
        let ids: Vec<ReviewId> = self.handles.lock().keys().cloned().collect();
        for review_id in ids {
            self.cancel_review(&review_id).await;
        }
    }
}

async fn drain_progress<G: IdGen + 'static>(
    review_id: ReviewId,
    store: Arc<Store>,
    id_gen: G,
    sink: EventSink,
    mut progress_rx: mpsc::Receiver<ReviewProgress>,
) {
    while let Some(progress) = progress_rx.recv().await {
        match progress {
            ReviewProgress::Chunk(text) => {
                sink(Event::ReviewChunk { review_id: review_id.clone(), text });
            }
            ReviewProgress::ToolUse { tool } => {
                sink(Event::ReviewToolUse { review_id: review_id.clone(), tool });
            }
            ReviewProgress::Finding { file, line, body } => {
                let comment = ReviewComment {
                    id: ReviewCommentId::new(id_gen.next()),
                    review_id: review_id.clone(),
                    file,
                    line,
                    body,
                    created_at: SystemTime::now(),
                };
                store.update_review(&review_id, |r| r.push_comment(comment.clone()));
                sink(Event::ReviewFinding { review_id: review_id.clone(), comment });
            }
            ReviewProgress::Resolved { comment_id } => {
                sink(Event::ReviewCommentResolved {
                    review_id: review_id.clone(),
                    comment_id: ReviewCommentId::new(comment_id),
                });
            }
            ReviewProgress::Complete => {
                store.update_review(&review_id, |r| r.finish(ReviewStatus::Completed, SystemTime::now()));
                sink(Event::ReviewComplete { review_id: review_id.clone(), success: true, error: None });
            }
            ReviewProgress::Failed(err) => {
                tracing::warn!(review_id = %review_id, error = %err, "reviewer failed");
                store.update_review(&review_id, |r| r.finish(ReviewStatus::Failed, SystemTime::now()));
                sink(Event::ReviewComplete { review_id: review_id.clone(), success: false, error: Some(err) });
            }
        }
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
