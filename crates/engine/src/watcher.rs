// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transcript Watcher Pool (§4.D): one polling task per session, tailing
//! its agent transcript, delegating line-level parsing and quiet-window
//! policy to the session's [`AgentBehavior`](attn_adapters::AgentBehavior),
//! and dispatching classification requests with only the transcript delta
//! since the last dispatch (§4.E).

use crate::classify_dispatch::ClassifierDispatcher;
use crate::interpreter;
use attn_adapters::{behavior_for, AgentBehavior};
use attn_core::{AgentKind, SessionId, SessionState};
use attn_storage::Store;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::oneshot;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEDUP_WINDOW: Duration = Duration::from_secs(2);
const QUIET_WINDOW: Duration = Duration::from_millis(1500);

/// Per-watcher mutable tailing state, private to its task (§5 concurrency
/// model: "each watcher's internal state is private to its goroutine").
struct TailState {
    transcript_path: Option<PathBuf>,
    last_offset: u64,
    last_classified_offset: u64,
    partial_line: String,
    last_assistant_content: Option<String>,
    last_assistant_at: Option<Instant>,
    assistant_seq: u64,
    classified_seq: u64,
    quiet_since: Option<Instant>,
}

impl TailState {
    fn new() -> Self {
        Self {
            transcript_path: None,
            last_offset: 0,
            last_classified_offset: 0,
            partial_line: String::new(),
            last_assistant_content: None,
            last_assistant_at: None,
            assistant_seq: 0,
            classified_seq: 0,
            quiet_since: None,
        }
    }
}

/// Manages the pool of active transcript watchers, one per session.
pub struct WatcherPool {
    watchers: Mutex<HashMap<SessionId, oneshot::Sender<()>>>,
    store: Arc<Store>,
    dispatcher: Arc<ClassifierDispatcher>,
}

impl WatcherPool {
    pub fn new(store: Arc<Store>, dispatcher: Arc<ClassifierDispatcher>) -> Self {
        Self {
            watchers: Mutex::new(HashMap::new()),
            store,
            dispatcher,
        }
    }

    /// Start watching `session_id`'s transcript. Tears down any existing
    /// watcher for the same id first, per §4.D startup rule.
    pub fn start(&self, session_id: SessionId, project_path: PathBuf, agent: AgentKind) {
        self.stop(&session_id);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.watchers.lock().insert(session_id.clone(), shutdown_tx);

        let store = self.store.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(run_watcher(session_id, project_path, agent, store, dispatcher, shutdown_rx));
    }

    /// Stop the watcher for `session_id`, if any.
    pub fn stop(&self, session_id: &SessionId) {
        if let Some(tx) = self.watchers.lock().remove(session_id) {
            let _ = tx.send(());
        }
    }

    /// Stop every watcher (daemon shutdown). The caller does not await
    /// drain here; each task observes the closed channel within one poll
    /// interval and exits on its own.
    pub fn stop_all(&self) {
        let mut watchers = self.watchers.lock();
        for (_, tx) in watchers.drain() {
            let _ = tx.send(());
        }
    }

    pub fn is_watching(&self, session_id: &SessionId) -> bool {
        self.watchers.lock().contains_key(session_id)
    }
}

async fn run_watcher(
    session_id: SessionId,
    project_path: PathBuf,
    agent: AgentKind,
    store: Arc<Store>,
    dispatcher: Arc<ClassifierDispatcher>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let behavior = behavior_for(&agent);
    let mut state = TailState::new();

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!(session_id = %session_id, "transcript watcher shutting down");
                return;
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }

        if store.get_session(&session_id).is_none() {
            tracing::debug!(session_id = %session_id, "session no longer registered, stopping watcher");
            return;
        }

        if state.transcript_path.is_none() {
            if let Some(found) = behavior.find_transcript(&project_path, session_id.as_str()) {
                let bootstrap = behavior.bootstrap_offset(&found);
                state.last_offset = bootstrap;
                state.last_classified_offset = bootstrap;
                state.transcript_path = Some(found);
                behavior.reset();
            } else {
                continue;
            }
        }

        let path = state.transcript_path.clone().unwrap();
        if !path.exists() {
            state.transcript_path = None;
            state.last_offset = 0;
            state.last_classified_offset = 0;
            continue;
        }

        let size = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(_) => continue,
        };
        if size < state.last_offset {
            state.last_offset = 0;
            state.last_classified_offset = 0;
            state.partial_line.clear();
            behavior.reset();
        }

        if size > state.last_offset {
            let Ok(new_bytes) = read_tail(&path, state.last_offset).await else {
                continue;
            };
            state.last_offset = size;

            let combined = format!("{}{}", state.partial_line, String::from_utf8_lossy(&new_bytes));
            let mut lines: Vec<&str> = combined.split('\n').collect();
            state.partial_line = lines.pop().unwrap_or("").to_string();

            let current_state = session_state(&store, &session_id);
            for line in lines {
                if line.is_empty() {
                    continue;
                }
                handle_line(&session_id, behavior.as_ref(), line, current_state, &store);
                if let Some(text) = behavior.handle_assistant_message(line) {
                    record_assistant_text(behavior.as_ref(), &mut state, text);
                }
            }
        }

        let current_state = session_state(&store, &session_id);
        let tick = behavior.tick(Instant::now(), current_state);
        if let Some(log) = tick.log {
            tracing::debug!(session_id = %session_id, "{log}");
        }
        if let Some(verdict) = tick.state {
            interpreter::apply_verdict(&store, &session_id, verdict, SystemTime::now());
        }
        if tick.block_classification {
            continue;
        }

        maybe_dispatch_classification(&session_id, &path, behavior.as_ref(), &mut state, &store, &dispatcher).await;
    }
}

fn session_state(store: &Store, session_id: &SessionId) -> SessionState {
    store.get_session(session_id).map(|s| s.state).unwrap_or_default()
}

fn handle_line(
    session_id: &SessionId,
    behavior: &dyn AgentBehavior,
    line: &str,
    current_state: SessionState,
    store: &Store,
) {
    let outcome = behavior.handle_line(line, Instant::now(), current_state);
    if let Some(log) = outcome.log {
        tracing::debug!(session_id = %session_id, "{log}");
    }
    if let Some(verdict) = outcome.state {
        interpreter::apply_verdict(store, session_id, verdict, SystemTime::now());
    }
}

async fn read_tail(path: &Path, from_offset: u64) -> std::io::Result<Vec<u8>> {
    use tokio::io::{AsyncReadExt, AsyncSeekExt};
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(std::io::SeekFrom::Start(from_offset)).await?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await?;
    Ok(buf)
}

fn record_assistant_text(behavior: &dyn AgentBehavior, state: &mut TailState, text: String) {
    let now = Instant::now();
    if behavior.deduplicate_assistant_events() {
        let is_dup = state.last_assistant_content.as_deref() == Some(text.as_str())
            && state
                .last_assistant_at
                .is_some_and(|at| now.duration_since(at) < DEDUP_WINDOW);
        if is_dup {
            return;
        }
    }
    state.last_assistant_content = Some(text);
    state.last_assistant_at = Some(now);
    state.assistant_seq += 1;
    state.quiet_since = Some(behavior.quiet_since(now));
}

/// Read and return only the transcript bytes appended since `from_offset`,
/// truncated to at most `max_bytes` (keeping the tail, never splitting a
/// UTF-8 code point) so the classifier always sees a bounded delta rather
/// than ever-growing history (§4.E).
async fn read_classification_delta(path: &Path, from_offset: u64, max_bytes: usize) -> std::io::Result<String> {
    let bytes = read_tail(path, from_offset).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if text.len() <= max_bytes {
        return Ok(text);
    }
    let min_start = text.len() - max_bytes;
    let start = text
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| i >= min_start)
        .unwrap_or(text.len());
    Ok(text[start..].to_string())
}

async fn maybe_dispatch_classification(
    session_id: &SessionId,
    transcript_path: &Path,
    behavior: &dyn AgentBehavior,
    state: &mut TailState,
    store: &Store,
    dispatcher: &ClassifierDispatcher,
) {
    let Some(quiet_since) = state.quiet_since else {
        return;
    };
    if state.assistant_seq <= state.classified_seq {
        return;
    }
    if quiet_since.elapsed() < QUIET_WINDOW {
        return;
    }

    let Some(session) = store.get_session(session_id) else {
        return;
    };
    let (skip, reason) = behavior.skip_classification(session.state, session.last_seen, SystemTime::now());
    if skip {
        tracing::debug!(
            session_id = %session_id,
            reason = reason.unwrap_or("unspecified"),
            "classification dispatch skipped by agent policy"
        );
        return;
    }

    state.classified_seq = state.assistant_seq;
    let from_offset = state.last_classified_offset;
    state.last_classified_offset = state.last_offset;

    if let Ok(delta) = read_classification_delta(transcript_path, from_offset, behavior.max_classify_bytes()).await {
        dispatcher.dispatch(session_id.clone(), delta);
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
