// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event hub (§4.B): fans out `Event`s to every connected WebSocket
//! client. Each client gets a bounded queue; a slow client that falls
//! behind never blocks the broadcaster — instead it is marked failed and
//! dropped from the subscriber map, which closes its queue's sending
//! half and lets its read/write loop in `transport::ws` observe the
//! receiver going empty and tear itself down.

use attn_core::Event;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

const CLIENT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

#[derive(Default)]
pub struct EventHub {
    clients: Mutex<HashMap<ClientId, mpsc::Sender<Event>>>,
    next_id: AtomicU64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client, returning its id and the receiving half of
    /// its queue. The caller is responsible for sending an initial
    /// snapshot event before forwarding further broadcasts, if it wants
    /// one (§4.B "initial snapshot on attach").
    pub fn subscribe(&self) -> (ClientId, mpsc::Receiver<Event>) {
        let id = ClientId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(CLIENT_QUEUE_CAPACITY);
        self.clients.lock().insert(id, tx);
        (id, rx)
    }

    pub fn unsubscribe(&self, id: ClientId) {
        self.clients.lock().remove(&id);
    }

    /// Send `event` to every connected client. Never blocks: a client
    /// whose queue is full is marked failed and closed rather than ever
    /// backing up the broadcaster (§4.B).
    pub fn broadcast(&self, event: Event) {
        let snapshot: Vec<(ClientId, mpsc::Sender<Event>)> = {
            let clients = self.clients.lock();
            clients.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut failed = Vec::new();
        for (id, tx) in snapshot {
            if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(event.clone()) {
                tracing::warn!(client = id.0, event = event.name(), "client queue full, marking failed and closing");
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            let mut clients = self.clients.lock();
            for id in failed {
                clients.remove(&id);
            }
        }
    }

    /// Send `event` to exactly one client, e.g. the initial snapshot sent
    /// only to the client that just attached. A full queue closes that
    /// client the same way `broadcast` does.
    pub fn send_to(&self, id: ClientId, event: Event) {
        let failed = {
            let clients = self.clients.lock();
            match clients.get(&id) {
                Some(tx) => matches!(tx.try_send(event), Err(mpsc::error::TrySendError::Full(_))),
                None => false,
            }
        };
        if failed {
            tracing::warn!(client = id.0, "client queue full, marking failed and closing");
            self.clients.lock().remove(&id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

#[cfg(test)]
#[path = "event_hub_tests.rs"]
mod tests;
