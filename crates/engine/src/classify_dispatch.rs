// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifier Dispatcher (§4.E): invokes the classifier collaborator with
//! a bounded timeout and applies the verdict through the PTY interpreter
//! (§4.C). Serialised per session id — a new request supersedes any
//! pending one for the same id.

use crate::interpreter;
use attn_adapters::{classify_with_default_timeout, Classifier};
use attn_core::SessionId;
use attn_storage::Store;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::task::AbortHandle;

pub struct ClassifierDispatcher {
    store: Arc<Store>,
    classifier: Arc<dyn Classifier>,
    inflight: Mutex<HashMap<SessionId, AbortHandle>>,
}

impl ClassifierDispatcher {
    pub fn new(store: Arc<Store>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            store,
            classifier,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch a classification request for `session_id` against
    /// `transcript`. Any request already pending for this session is
    /// cancelled first.
    pub fn dispatch(&self, session_id: SessionId, transcript: String) {
        let store = self.store.clone();
        let classifier = self.classifier.clone();
        let sid = session_id.clone();

        let join = tokio::spawn(async move {
            match classify_with_default_timeout(classifier.as_ref(), &transcript).await {
                Ok(verdict) => {
                    interpreter::apply_verdict(&store, &sid, verdict, SystemTime::now());
                }
                Err(err) => {
                    tracing::warn!(session_id = %sid, error = %err, "classifier request failed");
                }
            }
        });

        let mut inflight = self.inflight.lock();
        if let Some(previous) = inflight.insert(session_id, join.abort_handle()) {
            previous.abort();
        }
    }
}

#[cfg(test)]
#[path = "classify_dispatch_tests.rs"]
mod tests;
