// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command router (§4.H): the single place every inbound `Command`,
//! whatever transport it arrived on, gets dispatched. `perform` always
//! computes a synchronous `SocketReply` for the Unix-socket transport and,
//! for the subset of commands `Command::is_async_on_websocket` names, a
//! matching `Event` the WebSocket transport can emit once the work
//! finishes instead of blocking its frame loop on it.

use attn_adapters::{GitAdapter, GitHubAdapter, PtyAdapter};
use attn_core::{AgentKind, Command, Event, EventSink, IdGen, Pr, Session, SocketReply, UuidIdGen};
use attn_engine::{worktree as wt, ReviewDriver};
use attn_storage::Store;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

pub struct Router {
    pub store: Arc<Store>,
    pub git: Arc<dyn GitAdapter>,
    pub github: Arc<dyn GitHubAdapter>,
    pub pty: Arc<dyn PtyAdapter>,
    pub reviews: Arc<ReviewDriver<UuidIdGen>>,
    pub watchers: Arc<attn_engine::WatcherPool>,
    /// Side channel for events a single `perform` return can't carry: a
    /// worktree mutation needs both a broadcast-to-everyone notification
    /// (`worktree_created`/`worktree_deleted`) and a terminal result event
    /// for the caller, and `perform` only returns one `Option<Event>`.
    broadcast: EventSink,
}

fn rfc3339(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn agent_command(kind: &AgentKind) -> &str {
    match kind {
        AgentKind::Claude => "claude",
        AgentKind::Codex => "codex",
        AgentKind::Copilot => "copilot",
        AgentKind::Other(name) => name,
    }
}

impl Router {
    pub fn new(
        store: Arc<Store>,
        git: Arc<dyn GitAdapter>,
        github: Arc<dyn GitHubAdapter>,
        pty: Arc<dyn PtyAdapter>,
        reviews: Arc<ReviewDriver<UuidIdGen>>,
        watchers: Arc<attn_engine::WatcherPool>,
        broadcast: EventSink,
    ) -> Self {
        Self { store, git, github, pty, reviews, watchers, broadcast }
    }

    fn repos_payload(&self) -> Vec<serde_json::Value> {
        let prs = self.store.list_prs();
        let mut repos: Vec<String> = prs.iter().map(|pr| pr.repo.clone()).collect();
        repos.sort();
        repos.dedup();
        repos
            .into_iter()
            .map(|repo| {
                let settings = self.store.get_repo_settings(&repo);
                json!({
                    "repo": repo,
                    "muted": settings.muted,
                    "collapsed": settings.collapsed,
                })
            })
            .collect()
    }

    /// Perform `cmd`, returning the synchronous reply plus the event a
    /// WebSocket client should eventually see for the async-capable
    /// commands (always `None` for the purely synchronous ones).
    pub async fn perform(&self, cmd: Command) -> (SocketReply, Option<Event>) {
        match cmd {
            Command::Register { id, label, agent, directory } => {
                let now = SystemTime::now();
                let session = Session::new(id.clone(), label, agent.clone(), directory.clone(), now);
                self.store.add_session(session.clone());
                self.watchers.start(id, directory, agent);
                (SocketReply::ok(), Some(Event::SessionRegistered { session }))
            }
            Command::Unregister { id } => {
                self.watchers.stop(&id);
                match self.store.remove_session(&id) {
                    Some(_) => (SocketReply::ok(), Some(Event::SessionUnregistered { id })),
                    None => (SocketReply::err("unknown session"), None),
                }
            }
            Command::State { id, state } => {
                let now = SystemTime::now();
                match self.store.update_session_state(&id, state.clone(), now) {
                    Some(session) => (
                        SocketReply::ok(),
                        Some(Event::SessionStateChanged {
                            id,
                            state,
                            state_updated_at: rfc3339(session.state_updated_at),
                        }),
                    ),
                    None => (SocketReply::err("unknown session"), None),
                }
            }
            Command::Todos { id, todos } => match self.store.update_session_todos(&id, todos) {
                Some(_) => (SocketReply::ok(), None),
                None => (SocketReply::err("unknown session"), None),
            },
            Command::Query { filter } => (SocketReply::sessions(self.store.list_sessions(&filter)), None),
            Command::Heartbeat { id } => {
                let now = SystemTime::now();
                match self.store.touch_session(&id, now) {
                    Some(_) => (SocketReply::ok(), None),
                    None => (SocketReply::err("unknown session"), None),
                }
            }
            Command::Mute { id, muted } => match self.store.set_session_muted(&id, muted) {
                Some(_) => (SocketReply::ok(), None),
                None => (SocketReply::err("unknown session"), None),
            },

            Command::QueryPrs => (SocketReply::prs(self.store.list_prs()), None),
            Command::MutePr { id, muted } => match self.store.set_pr_muted(&id, muted) {
                Some(_) => (SocketReply::ok(), None),
                None => (SocketReply::err("unknown pr"), None),
            },
            Command::MuteRepo { repo, muted } => {
                self.store.set_repo_muted(&repo, muted);
                (SocketReply::ok(), None)
            }
            Command::CollapseRepo { repo, collapsed } => {
                self.store.set_repo_collapsed(&repo, collapsed);
                (SocketReply::ok(), None)
            }
            Command::QueryRepos => {
                let mut reply = SocketReply::ok();
                reply.repos = Some(self.repos_payload());
                (reply, None)
            }
            Command::FetchPrDetails { repo, number } => match self.github.fetch_pr_details(&repo, number).await {
                Ok(pr) => {
                    let muted = self.store.get_pr(&pr.id).map(|existing| existing.muted).unwrap_or(false);
                    self.store.upsert_pr(Pr { muted, ..pr });
                    (SocketReply::ok(), Some(Event::PrActionResult { success: true, error: None }))
                }
                Err(err) => (
                    SocketReply::err(err.to_string()),
                    Some(Event::PrActionResult { success: false, error: Some(err.to_string()) }),
                ),
            },
            Command::ApprovePr { repo, number } => match self.github.approve(&repo, number).await {
                Ok(()) => (SocketReply::ok(), Some(Event::PrActionResult { success: true, error: None })),
                Err(err) => (
                    SocketReply::err(err.to_string()),
                    Some(Event::PrActionResult { success: false, error: Some(err.to_string()) }),
                ),
            },

            Command::SpawnSession { label, agent, directory } => {
                let id = attn_core::SessionId::new(UuidIdGen.next());
                match self.pty.spawn(&directory, agent_command(&agent)).await {
                    Ok(_pty_session_id) => {
                        let now = SystemTime::now();
                        self.store.add_session(Session::new(id.clone(), label, agent.clone(), directory.clone(), now));
                        self.watchers.start(id.clone(), directory, agent);
                        (
                            SocketReply::ok(),
                            Some(Event::SpawnResult { success: true, id: Some(id), error: None }),
                        )
                    }
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::SpawnResult { success: false, id: None, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::AttachSession { id } => match self.store.get_session(&id) {
                Some(_) => (SocketReply::ok(), Some(Event::AttachResult { success: true, error: None })),
                None => (
                    SocketReply::err("unknown session"),
                    Some(Event::AttachResult { success: false, error: Some("unknown session".to_string()) }),
                ),
            },
            Command::KillSession { id } => {
                self.watchers.stop(&id);
                self.store.remove_session(&id);
                (SocketReply::ok(), None)
            }
            Command::PtyInput { id, data } => {
                let Ok(bytes) = BASE64.decode(&data) else {
                    return (SocketReply::err("invalid base64 pty input"), None);
                };
                match self.pty.write_input(id.as_str(), &bytes).await {
                    Ok(()) => (SocketReply::ok(), None),
                    Err(err) => (SocketReply::err(err.to_string()), None),
                }
            }

            // ReviewDriver pushes review_started/review_cancelled (and every
            // subsequent review_chunk/review_finding/.../review_complete)
            // through its own event sink as the run actually progresses, so
            // perform() itself has nothing further to hand back here.
            Command::StartReview { review_id, session_id, base_branch, .. } => {
                match self.store.get_session(&session_id) {
                    Some(session) => {
                        self.reviews
                            .start_review(review_id, session_id, session.directory, base_branch)
                            .await;
                        (SocketReply::ok(), None)
                    }
                    None => (SocketReply::err("unknown session"), None),
                }
            }
            Command::CancelReview { review_id } => {
                self.reviews.cancel_review(&review_id).await;
                (SocketReply::ok(), None)
            }

            Command::ListBranches { main_repo } => match wt::list_branches(self.git.as_ref(), &main_repo).await {
                Ok(branches) => (SocketReply::data(json!({ "branches": branches })), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::CreateBranch { main_repo, branch } => {
                match wt::create_branch(&self.store, self.git.as_ref(), &main_repo, &branch).await {
                    Ok(()) => (SocketReply::ok(), Some(Event::CreateBranchResult { success: true, error: None })),
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::CreateBranchResult { success: false, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::DeleteBranch { main_repo, branch, force } => {
                match wt::delete_branch(&self.store, self.git.as_ref(), &main_repo, &branch, force).await {
                    Ok(()) => (SocketReply::ok(), Some(Event::DeleteBranchResult { success: true, error: None })),
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::DeleteBranchResult { success: false, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::SwitchBranch { main_repo, branch } => {
                match wt::switch_branch(&self.store, self.git.as_ref(), &main_repo, &branch).await {
                    Ok(()) => (SocketReply::ok(), Some(Event::SwitchBranchResult { success: true, error: None })),
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::SwitchBranchResult { success: false, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::CreateWorktree { main_repo, path, source } => {
                match wt::create_worktree(&self.store, self.git.as_ref(), &main_repo, path, None, source.as_ref()).await {
                    Ok(worktree) => {
                        (self.broadcast)(Event::WorktreeCreated { path: worktree.path.clone(), branch: worktree.branch.clone() });
                        (
                            SocketReply::ok(),
                            Some(Event::CreateWorktreeResult { success: true, path: Some(worktree.path), error: None }),
                        )
                    }
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::CreateWorktreeResult { success: false, path: None, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::CreateWorktreeFromBranch { main_repo, branch } => {
                let source = attn_core::WorktreeSource::ExistingBranch { branch: branch.clone() };
                match wt::create_worktree(&self.store, self.git.as_ref(), &main_repo, None, Some(&branch), Some(&source)).await {
                    Ok(worktree) => {
                        (self.broadcast)(Event::WorktreeCreated { path: worktree.path.clone(), branch: worktree.branch.clone() });
                        (
                            SocketReply::ok(),
                            Some(Event::CreateWorktreeResult { success: true, path: Some(worktree.path), error: None }),
                        )
                    }
                    Err(err) => (
                        SocketReply::err(err.to_string()),
                        Some(Event::CreateWorktreeResult { success: false, path: None, error: Some(err.to_string()) }),
                    ),
                }
            }
            Command::DeleteWorktree { path } => match wt::delete_worktree(&self.store, self.git.as_ref(), &path).await {
                Ok(()) => {
                    (self.broadcast)(Event::WorktreeDeleted { path });
                    (SocketReply::ok(), Some(Event::DeleteWorktreeResult { success: true, error: None }))
                }
                Err(err) => (
                    SocketReply::err(err.to_string()),
                    Some(Event::DeleteWorktreeResult { success: false, error: Some(err.to_string()) }),
                ),
            },
            Command::GetRepoInfo { main_repo } => match wt::get_repo_info(&self.store, self.git.as_ref(), &main_repo).await {
                Ok(info) => (
                    SocketReply::ok(),
                    Some(Event::GetRepoInfoResult { success: true, info: Some(info.to_json()), error: None }),
                ),
                Err(err) => (
                    SocketReply::err(err.to_string()),
                    Some(Event::GetRepoInfoResult { success: false, info: None, error: Some(err.to_string()) }),
                ),
            },
            Command::CheckDirty { main_repo } => match self.git.is_dirty(&main_repo).await {
                Ok(dirty) => (SocketReply::data(json!({ "dirty": dirty })), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::Stash { main_repo } => match self.git.stash(&main_repo, "attn-stash").await {
                Ok(()) => (SocketReply::ok(), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::StashPop { main_repo } => match self.git.stash_pop(&main_repo).await {
                Ok(()) => (SocketReply::ok(), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::CheckAttnStash { main_repo } => match self.git.find_stash(&main_repo, "attn-stash").await {
                Ok(found) => (SocketReply::data(json!({ "stash": found })), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::CommitWip { main_repo } => match self.git.commit_wip(&main_repo, "attn: wip").await {
                Ok(()) => (SocketReply::ok(), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::GetDefaultBranch { main_repo } => match self.git.get_default_branch(&main_repo).await {
                Ok(branch) => (SocketReply::data(json!({ "branch": branch })), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::FetchRemotes { main_repo } => match self.git.fetch_remotes(&main_repo).await {
                Ok(()) => (SocketReply::ok(), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
            Command::ListRemoteBranches { main_repo } => match self.git.list_remote_branches(&main_repo).await {
                Ok(branches) => (SocketReply::data(json!({ "branches": branches })), None),
                Err(err) => (SocketReply::err(err.to_string()), None),
            },
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
