// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! attn-daemon: the event hub (§4.B), the command router (§4.H), the
//! Unix-socket + WebSocket transport (§4.I), and the daemon shell that
//! wires them together (§4.J).

pub mod config;
pub mod daemon;
pub mod daemon_id;
pub mod env;
pub mod error;
pub mod event_hub;
pub mod lock;
pub mod router;
pub mod transport;
pub mod wire;

pub use config::Config;
pub use daemon::Daemon;
pub use error::DaemonError;
pub use event_hub::{ClientId, EventHub};
pub use router::Router;
