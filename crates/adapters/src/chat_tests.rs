// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_adapter_listen_returns_immediately() {
    let adapter = NoOpChatAdapter;
    adapter.listen(Box::new(|_| {})).await.unwrap();
}

#[tokio::test]
async fn noop_adapter_post_is_a_no_op() {
    let adapter = NoOpChatAdapter;
    let key = SubscriptionKey::new("slack", "C123", None);
    adapter.post(&key, "hello").await.unwrap();
}
