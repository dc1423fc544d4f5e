// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport (§4.I): one axum `/ws` endpoint. Each client gets
//! an event-hub subscription and a per-client reader/writer pair, exactly
//! as the teacher's HTTP server is described in §4.J: one upgrade, one
//! read loop and one write loop per client, torn down when the socket
//! closes.

use crate::event_hub::EventHub;
use crate::router::Router;
use attn_core::{Command, Event};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct WsState {
    pub router: Arc<Router>,
    pub hub: Arc<EventHub>,
}

pub fn app(state: WsState) -> axum::Router {
    axum::Router::new().route("/ws", get(upgrade)).with_state(state)
}

pub async fn serve(addr: SocketAddr, state: WsState, shutdown: Arc<tokio::sync::Notify>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await
}

async fn upgrade(State(state): State<WsState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// §4.B: every new client converges on the current session list
/// regardless of when it joined, instead of waiting for the next
/// mutation to learn anything.
fn send_initial_snapshot(state: &WsState, client_id: crate::event_hub::ClientId) {
    let sessions = state.router.store.list_sessions("");
    state.hub.send_to(client_id, Event::SessionsUpdated { sessions });
}

async fn handle_socket(socket: WebSocket, state: WsState) {
    let (mut sender, mut receiver) = socket.split();
    let (client_id, mut events) = state.hub.subscribe();
    send_initial_snapshot(&state, client_id);

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&text, &state, client_id).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "websocket read error");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => {
                        let payload = serde_json::to_string(&event).unwrap_or_default();
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    state.hub.unsubscribe(client_id);
}

async fn handle_frame(text: &str, state: &WsState, client_id: crate::event_hub::ClientId) {
    let cmd: Command = match serde_json::from_str(text) {
        Ok(cmd) => cmd,
        Err(err) => {
            state.hub.send_to(
                client_id,
                Event::CommandError { cmd: text.to_string(), error: err.to_string() },
            );
            return;
        }
    };

    if cmd.is_async_on_websocket() {
        let router = state.router.clone();
        let hub = state.hub.clone();
        tokio::spawn(async move {
            let (_, event) = router.perform(cmd).await;
            if let Some(event) = event {
                hub.broadcast(event);
            }
        });
    } else {
        let (_, event) = state.router.perform(cmd).await;
        if let Some(event) = event {
            state.hub.broadcast(event);
        }
        debug!("synchronous command handled over websocket");
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
