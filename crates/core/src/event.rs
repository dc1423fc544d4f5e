// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol envelopes: inbound commands and outbound events (§6, §9
//! redesign flag "dynamic JSON envelopes").
//!
//! Both directions use an internally-tagged enum so the command router and
//! the event hub can dispatch on a single `cmd`/`event` discriminant without
//! a secondary match on payload shape. The Unix-socket transport accepts
//! every variant but only ever emits a synchronous `{ok, ...}` reply; the
//! WebSocket transport accepts the same variants and, for long-running ones,
//! instead emits a matching `*_result` event asynchronously (§4.H).

use crate::agent::{AgentKind, SessionState};
use crate::review::ReviewId;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a new worktree's branch should come from. `None` means branch off
/// the main repo's current HEAD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorktreeSource {
    ExistingBranch { branch: String },
    RemoteBranch { remote_branch: String },
    StartPoint { point: String },
}

/// A request arriving over the Unix socket or the WebSocket transport.
///
/// Shared verbatim by both transports (§4.H Command router): the router
/// does not know or care which one received the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Register {
        id: SessionId,
        label: String,
        agent: AgentKind,
        directory: PathBuf,
    },
    Unregister {
        id: SessionId,
    },
    State {
        id: SessionId,
        state: SessionState,
    },
    Todos {
        id: SessionId,
        todos: serde_json::Value,
    },
    Query {
        #[serde(default)]
        filter: String,
    },
    Heartbeat {
        id: SessionId,
    },
    Mute {
        id: SessionId,
        muted: bool,
    },

    QueryPrs,
    MutePr {
        id: crate::pr::PrId,
        muted: bool,
    },
    MuteRepo {
        repo: String,
        muted: bool,
    },
    CollapseRepo {
        repo: String,
        collapsed: bool,
    },
    QueryRepos,
    FetchPrDetails {
        repo: String,
        number: u64,
    },
    ApprovePr {
        repo: String,
        number: u64,
    },

    SpawnSession {
        label: String,
        agent: AgentKind,
        directory: PathBuf,
    },
    AttachSession {
        id: SessionId,
    },
    KillSession {
        id: SessionId,
    },
    PtyInput {
        id: SessionId,
        /// base64-encoded bytes to write to the PTY.
        data: String,
    },

    StartReview {
        review_id: ReviewId,
        session_id: SessionId,
        base_branch: String,
        #[serde(default)]
        is_rereview: bool,
        #[serde(default)]
        last_review_sha: Option<String>,
    },
    CancelReview {
        review_id: ReviewId,
    },

    ListBranches {
        main_repo: PathBuf,
    },
    DeleteBranch {
        main_repo: PathBuf,
        branch: String,
        #[serde(default)]
        force: bool,
    },
    SwitchBranch {
        main_repo: PathBuf,
        branch: String,
    },
    CreateBranch {
        main_repo: PathBuf,
        branch: String,
    },
    CreateWorktree {
        main_repo: PathBuf,
        #[serde(default)]
        path: Option<PathBuf>,
        #[serde(default)]
        source: Option<WorktreeSource>,
    },
    CreateWorktreeFromBranch {
        main_repo: PathBuf,
        branch: String,
    },
    DeleteWorktree {
        path: PathBuf,
    },
    GetRepoInfo {
        main_repo: PathBuf,
    },
    CheckDirty {
        main_repo: PathBuf,
    },
    Stash {
        main_repo: PathBuf,
    },
    StashPop {
        main_repo: PathBuf,
    },
    CheckAttnStash {
        main_repo: PathBuf,
    },
    CommitWip {
        main_repo: PathBuf,
    },
    GetDefaultBranch {
        main_repo: PathBuf,
    },
    FetchRemotes {
        main_repo: PathBuf,
    },
    ListRemoteBranches {
        main_repo: PathBuf,
    },
}

impl Command {
    /// Short discriminant name, used for log lines (mirrors the teacher's
    /// `Event::name`).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register { .. } => "register",
            Command::Unregister { .. } => "unregister",
            Command::State { .. } => "state",
            Command::Todos { .. } => "todos",
            Command::Query { .. } => "query",
            Command::Heartbeat { .. } => "heartbeat",
            Command::Mute { .. } => "mute",
            Command::QueryPrs => "query_prs",
            Command::MutePr { .. } => "mute_pr",
            Command::MuteRepo { .. } => "mute_repo",
            Command::CollapseRepo { .. } => "collapse_repo",
            Command::QueryRepos => "query_repos",
            Command::FetchPrDetails { .. } => "fetch_pr_details",
            Command::ApprovePr { .. } => "approve_pr",
            Command::SpawnSession { .. } => "spawn_session",
            Command::AttachSession { .. } => "attach_session",
            Command::KillSession { .. } => "kill_session",
            Command::PtyInput { .. } => "pty_input",
            Command::StartReview { .. } => "start_review",
            Command::CancelReview { .. } => "cancel_review",
            Command::ListBranches { .. } => "list_branches",
            Command::DeleteBranch { .. } => "delete_branch",
            Command::SwitchBranch { .. } => "switch_branch",
            Command::CreateBranch { .. } => "create_branch",
            Command::CreateWorktree { .. } => "create_worktree",
            Command::CreateWorktreeFromBranch { .. } => "create_worktree_from_branch",
            Command::DeleteWorktree { .. } => "delete_worktree",
            Command::GetRepoInfo { .. } => "get_repo_info",
            Command::CheckDirty { .. } => "check_dirty",
            Command::Stash { .. } => "stash",
            Command::StashPop { .. } => "stash_pop",
            Command::CheckAttnStash { .. } => "check_attn_stash",
            Command::CommitWip { .. } => "commit_wip",
            Command::GetDefaultBranch { .. } => "get_default_branch",
            Command::FetchRemotes { .. } => "fetch_remotes",
            Command::ListRemoteBranches { .. } => "list_remote_branches",
        }
    }

    /// True for commands whose WebSocket handling is asynchronous: the
    /// router returns no synchronous acknowledgement and instead spawns a
    /// task that emits a `*_result` event later (§4.H).
    pub fn is_async_on_websocket(&self) -> bool {
        matches!(
            self,
            Command::CreateWorktree { .. }
                | Command::CreateWorktreeFromBranch { .. }
                | Command::DeleteWorktree { .. }
                | Command::CreateBranch { .. }
                | Command::DeleteBranch { .. }
                | Command::SwitchBranch { .. }
                | Command::StartReview { .. }
                | Command::CancelReview { .. }
                | Command::FetchPrDetails { .. }
                | Command::GetRepoInfo { .. }
                | Command::SpawnSession { .. }
                | Command::AttachSession { .. }
        )
    }
}

/// Callback a long-running handler (the Review Driver, worktree mutations)
/// uses to push an `Event` to the hub outside of its own return value, so it
/// can emit more than one event over its lifetime. The daemon builds the
/// real instance from `EventHub::broadcast`; `attn-core` only needs the
/// shape so lower crates (`attn-engine`) can depend on it without depending
/// on `attn-daemon`.
pub type EventSink = std::sync::Arc<dyn Fn(Event) + Send + Sync>;

/// A notification pushed to connected WebSocket clients (§4.B Event hub,
/// §6 Event envelopes). Unix-socket clients never receive these; that
/// transport is strictly request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SessionRegistered {
        session: crate::session::Session,
    },
    SessionStateChanged {
        id: SessionId,
        state: SessionState,
        state_updated_at: String,
    },
    SessionUnregistered {
        id: SessionId,
    },
    SessionsUpdated {
        sessions: Vec<crate::session::Session>,
    },
    SessionExited {
        id: SessionId,
        #[serde(default)]
        exit_code: Option<i32>,
    },
    PtyOutput {
        id: SessionId,
        /// base64-encoded PTY bytes.
        data: String,
    },
    SpawnResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<SessionId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    AttachResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    CommandError {
        cmd: String,
        error: String,
    },

    WorktreeCreated {
        path: PathBuf,
        branch: String,
    },
    WorktreeDeleted {
        path: PathBuf,
    },
    WorktreesUpdated {
        main_repo: PathBuf,
        worktrees: Vec<crate::worktree::Worktree>,
    },
    BranchesResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branches: Option<Vec<crate::worktree::BranchInfo>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    CreateWorktreeResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    DeleteWorktreeResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    CreateBranchResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    DeleteBranchResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    SwitchBranchResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GetRepoInfoResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        info: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    ReviewStarted {
        review_id: ReviewId,
    },
    ReviewChunk {
        review_id: ReviewId,
        text: String,
    },
    ReviewFinding {
        review_id: ReviewId,
        comment: crate::review::ReviewComment,
    },
    ReviewToolUse {
        review_id: ReviewId,
        tool: String,
    },
    ReviewCommentResolved {
        review_id: ReviewId,
        comment_id: crate::review::ReviewCommentId,
    },
    ReviewComplete {
        review_id: ReviewId,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ReviewCancelled {
        review_id: ReviewId,
    },

    PrActionResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionRegistered { .. } => "session_registered",
            Event::SessionStateChanged { .. } => "session_state_changed",
            Event::SessionUnregistered { .. } => "session_unregistered",
            Event::SessionsUpdated { .. } => "sessions_updated",
            Event::SessionExited { .. } => "session_exited",
            Event::PtyOutput { .. } => "pty_output",
            Event::SpawnResult { .. } => "spawn_result",
            Event::AttachResult { .. } => "attach_result",
            Event::CommandError { .. } => "command_error",
            Event::WorktreeCreated { .. } => "worktree_created",
            Event::WorktreeDeleted { .. } => "worktree_deleted",
            Event::WorktreesUpdated { .. } => "worktrees_updated",
            Event::BranchesResult { .. } => "branches_result",
            Event::CreateWorktreeResult { .. } => "create_worktree_result",
            Event::DeleteWorktreeResult { .. } => "delete_worktree_result",
            Event::CreateBranchResult { .. } => "create_branch_result",
            Event::DeleteBranchResult { .. } => "delete_branch_result",
            Event::SwitchBranchResult { .. } => "switch_branch_result",
            Event::GetRepoInfoResult { .. } => "get_repo_info_result",
            Event::ReviewStarted { .. } => "review_started",
            Event::ReviewChunk { .. } => "review_chunk",
            Event::ReviewFinding { .. } => "review_finding",
            Event::ReviewToolUse { .. } => "review_tool_use",
            Event::ReviewCommentResolved { .. } => "review_comment_resolved",
            Event::ReviewComplete { .. } => "review_complete",
            Event::ReviewCancelled { .. } => "review_cancelled",
            Event::PrActionResult { .. } => "pr_action_result",
        }
    }

    /// The session this event is most relevant to, if any. Used to route
    /// per-session chat-platform notifications (§4.K).
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Event::SessionRegistered { session } => Some(&session.id),
            Event::SessionStateChanged { id, .. } => Some(id),
            Event::SessionUnregistered { id } => Some(id),
            Event::SessionExited { id, .. } => Some(id),
            Event::PtyOutput { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// The Unix-socket transport's synchronous reply envelope (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<crate::session::Session>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prs: Option<Vec<crate::pr::Pr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<serde_json::Value>>,
    /// Opaque payload for query-style commands with no dedicated field
    /// (`CheckDirty`, `ListBranches`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SocketReply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
            sessions: None,
            prs: None,
            repos: None,
            data: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            sessions: None,
            prs: None,
            repos: None,
            data: None,
        }
    }

    pub fn sessions(sessions: Vec<crate::session::Session>) -> Self {
        Self {
            sessions: Some(sessions),
            ..Self::ok()
        }
    }

    pub fn prs(prs: Vec<crate::pr::Pr>) -> Self {
        Self {
            prs: Some(prs),
            ..Self::ok()
        }
    }

    pub fn data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
