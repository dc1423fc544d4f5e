// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifier collaborator: given transcript text, decide the session's
//! semantic state (§4.E Classifier Dispatcher). The dispatcher (in
//! `attn-engine`) owns the timeout/serialization/supersede policy; this
//! module only wraps the call itself.

use crate::subprocess::CLASSIFIER_TIMEOUT;
use async_trait::async_trait;
use attn_core::SessionState;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier failed: {0}")]
    Failed(String),
    #[error("classifier timed out")]
    Timeout,
    #[error("malformed classifier output: {0}")]
    MalformedOutput(String),
}

/// Collaborator that maps transcript text to a `SessionState` verdict.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    async fn classify(&self, transcript: &str, timeout: Duration) -> Result<SessionState, ClassifierError>;
}

/// Classifier backed by an external script: the script receives the
/// transcript text on stdin and must print one of the `SessionState` wire
/// names (`working`, `waiting_input`, `idle`, `pending_approval`) on stdout.
#[derive(Clone, Debug)]
pub struct ScriptClassifier {
    script_path: std::path::PathBuf,
}

impl ScriptClassifier {
    pub fn new(script_path: std::path::PathBuf) -> Self {
        Self { script_path }
    }
}

fn parse_verdict(s: &str) -> Result<SessionState, ClassifierError> {
    match s.trim() {
        "working" => Ok(SessionState::Working),
        "waiting_input" => Ok(SessionState::WaitingInput),
        "idle" => Ok(SessionState::Idle),
        "pending_approval" => Ok(SessionState::PendingApproval),
        other => Err(ClassifierError::MalformedOutput(other.to_string())),
    }
}

#[async_trait]
impl Classifier for ScriptClassifier {
    async fn classify(
        &self,
        transcript: &str,
        timeout: Duration,
    ) -> Result<SessionState, ClassifierError> {
        use tokio::io::AsyncWriteExt;

        let mut cmd = Command::new(&self.script_path);
        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| ClassifierError::Failed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(transcript.as_bytes()).await;
        }

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ClassifierError::Timeout)?
            .map_err(|e| ClassifierError::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(ClassifierError::Failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        parse_verdict(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Runs `classify` with the crate's default timeout (§4.E: 10s). Kept
/// separate from the trait method so callers needing the default don't
/// repeat the constant.
pub async fn classify_with_default_timeout(
    classifier: &dyn Classifier,
    transcript: &str,
) -> Result<SessionState, ClassifierError> {
    classifier.classify(transcript, CLASSIFIER_TIMEOUT).await
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClassifier;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Scripted `Classifier` for deterministic testing.
    #[derive(Clone)]
    pub struct FakeClassifier {
        inner: Arc<Mutex<Vec<Result<SessionState, String>>>>,
    }

    impl Default for FakeClassifier {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FakeClassifier {
        pub fn new() -> Self {
            Self {
                inner: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Queue a verdict to return on the next call (FIFO).
        pub fn push_verdict(&self, verdict: SessionState) {
            self.inner.lock().push(Ok(verdict));
        }

        pub fn push_failure(&self, message: &str) {
            self.inner.lock().push(Err(message.to_string()));
        }
    }

    #[async_trait]
    impl Classifier for FakeClassifier {
        async fn classify(
            &self,
            _transcript: &str,
            _timeout: Duration,
        ) -> Result<SessionState, ClassifierError> {
            let mut queue = self.inner.lock();
            let next = if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            };
            match next {
                Some(Ok(state)) => Ok(state),
                Some(Err(msg)) => Err(ClassifierError::Failed(msg)),
                None => Err(ClassifierError::Failed("no verdict queued".to_string())),
            }
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
