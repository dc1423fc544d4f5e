// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon shell (§4.J): owns the store, the event hub, and the command
//! router, and drives the periodic persistence and PR-poll ticks. The
//! Unix-socket and WebSocket listeners (`crate::transport`) are spawned
//! separately by `main` against the pieces assembled here.

use crate::config::Config;
use crate::env;
use crate::event_hub::EventHub;
use crate::router::Router;
use attn_adapters::{GitAdapter, GitHubAdapter, PtyAdapter};
use attn_core::{Pr, UuidIdGen};
use attn_engine::{ClassifierDispatcher, ReviewDriver, WatcherPool};
use attn_storage::{load_or_default, persist_now, Store};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

pub struct Daemon {
    pub config: Config,
    pub store: Arc<Store>,
    pub hub: Arc<EventHub>,
    pub router: Arc<Router>,
    pub shutdown: Arc<Notify>,
}

impl Daemon {
    pub fn new(
        config: Config,
        git: Arc<dyn GitAdapter>,
        github: Arc<dyn GitHubAdapter>,
        pty: Arc<dyn PtyAdapter>,
        classifier: Arc<dyn attn_adapters::Classifier>,
        reviewer: Arc<dyn attn_adapters::Reviewer>,
    ) -> Self {
        let store = Arc::new(load_or_default(&config.snapshot_path));
        let hub = Arc::new(EventHub::new());
        let dispatcher = Arc::new(ClassifierDispatcher::new(store.clone(), classifier));
        let watchers = Arc::new(WatcherPool::new(store.clone(), dispatcher));

        let broadcast_hub = hub.clone();
        let sink: attn_core::EventSink = Arc::new(move |event| broadcast_hub.broadcast(event));

        let reviews = Arc::new(ReviewDriver::new(store.clone(), reviewer, UuidIdGen, sink.clone()));
        let router = Arc::new(Router::new(store.clone(), git, github, pty, reviews, watchers, sink));

        Self {
            config,
            store,
            hub,
            router,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawn the persistence and PR-poll tickers. Transport listeners are
    /// spawned separately (`crate::transport::{unix, ws}`).
    pub fn start_background_tasks(&self) {
        spawn_persistence_ticker(self.store.clone(), self.config.snapshot_path.clone(), self.shutdown.clone());
        spawn_pr_poll_ticker(self.store.clone(), self.router.github.clone(), self.shutdown.clone());
    }

    /// Flush a final snapshot, stop every transcript watcher, and cancel
    /// any reviews still in flight.
    pub async fn stop(&self) {
        self.shutdown.notify_waiters();
        self.router.watchers.stop_all();
        self.router.reviews.cancel_all().await;
        if let Err(err) = persist_now(&self.store, &self.config.snapshot_path) {
            warn!(error = %err, "failed to persist final snapshot on shutdown");
        }
    }
}

/// Repos the daemon already knows about: anything with a stored PR or an
/// explicit mute/collapse setting. There is no separate repo-subscription
/// list (§6 describes no such command) — the watched set grows as PRs are
/// fetched and shrinks only if every PR for a repo is gone and its settings
/// are never recorded.
fn watched_repos(store: &Store) -> Vec<String> {
    let mut repos: Vec<String> = store.list_prs().into_iter().map(|pr| pr.repo).collect();
    repos.extend(store.repo_settings_snapshot().into_keys());
    repos.sort();
    repos.dedup();
    repos
}

fn spawn_persistence_ticker(store: Arc<Store>, snapshot_path: std::path::PathBuf, shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(env::persist_interval());
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(err) = persist_now(&store, &snapshot_path) {
                        warn!(error = %err, "periodic snapshot persist failed");
                    }
                }
                _ = shutdown.notified() => break,
            }
        }
    });
}

fn spawn_pr_poll_ticker(store: Arc<Store>, github: Arc<dyn GitHubAdapter>, shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(env::pr_poll_interval());
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let repos = watched_repos(&store);
                    if repos.is_empty() {
                        continue;
                    }
                    match github.fetch_all(&repos).await {
                        Ok(prs) => {
                            for pr in prs {
                                let muted = store.get_pr(&pr.id).map(|existing| existing.muted).unwrap_or(false);
                                store.upsert_pr(Pr { muted, ..pr });
                            }
                        }
                        Err(err) => warn!(error = %err, "PR poll failed, retrying next tick"),
                    }
                }
                _ = shutdown.notified() => break,
            }
        }
        info!("PR poll ticker stopped");
    });
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
