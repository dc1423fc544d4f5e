// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the black-box `attn` specs: a [`Project`] gives each
//! test an isolated state dir and working directory, [`CliBuilder`] drives
//! the `attn` binary through it, and [`RunAssert`] asserts on the result.

use assert_cmd::Command as AssertCommand;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Poll `condition` until it returns `true` or `timeout_ms` elapses.
pub fn wait_for(timeout_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
}

pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), dir: None, envs: Vec::new() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    pub fn command(self) -> RunAssert {
        let mut cmd = AssertCommand::cargo_bin("attn").expect("attn binary is built");
        cmd.args(&self.args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        for (k, v) in &self.envs {
            cmd.env(k, v);
        }
        let output = cmd.output().expect("attn is spawnable");
        RunAssert { output }
    }

    pub fn passes(self) -> RunAssert {
        let run = self.command();
        assert!(run.output.status.success(), "expected success, got: {}\nstderr: {}", run.output.status, run.stderr());
        run
    }

    pub fn fails(self) -> RunAssert {
        let run = self.command();
        assert!(!run.output.status.success(), "expected failure, got success\nstdout: {}", run.stdout());
        run
    }
}

pub struct RunAssert {
    output: std::process::Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn success(&self) -> bool {
        self.output.status.success()
    }

    pub fn stdout_has(&self, needle: &str) -> &Self {
        assert!(self.stdout().contains(needle), "stdout did not contain {needle:?}:\n{}", self.stdout());
        self
    }

    pub fn stdout_lacks(&self, needle: &str) -> &Self {
        assert!(!self.stdout().contains(needle), "stdout unexpectedly contained {needle:?}:\n{}", self.stdout());
        self
    }

    pub fn stderr_has(&self, needle: &str) -> &Self {
        assert!(self.stderr().contains(needle), "stderr did not contain {needle:?}:\n{}", self.stderr());
        self
    }

    /// Parse stdout as the pretty-printed `SocketReply` JSON `attn send` prints.
    pub fn reply_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout()))
    }
}

/// An isolated project: its own working directory and its own daemon
/// state dir, so tests never share a socket or a snapshot file.
pub struct Project {
    dir: TempDir,
    state_dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().expect("tempdir"), state_dir: TempDir::new().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// `git init` the project dir with a first commit, so worktree/branch
    /// commands have something real to operate on.
    pub fn git_init(self) -> Self {
        let run = |args: &[&str]| {
            let status = std::process::Command::new("git")
                .args(args)
                .current_dir(self.path())
                .env("GIT_AUTHOR_NAME", "attn-specs")
                .env("GIT_AUTHOR_EMAIL", "attn-specs@example.com")
                .env("GIT_COMMITTER_NAME", "attn-specs")
                .env("GIT_COMMITTER_EMAIL", "attn-specs@example.com")
                .status()
                .expect("git is installed");
            assert!(status.success(), "git {args:?} failed");
        };
        run(&["init", "--initial-branch=main"]);
        self.file("README.md", "attn-specs fixture\n");
        run(&["add", "."]);
        run(&["commit", "-m", "initial"]);
        self
    }

    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    /// A `CliBuilder` pre-wired to this project's working directory and
    /// isolated daemon state directory.
    pub fn attn(&self) -> CliBuilder {
        CliBuilder::new().pwd(self.path()).env("ATTN_STATE_DIR", self.state_path())
    }

    pub fn send(&self, command: &serde_json::Value) -> RunAssert {
        self.attn().args(&["send", &command.to_string()]).command()
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let _ = self.attn().args(&["stop"]).command();
    }
}
