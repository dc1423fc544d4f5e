// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! attn-storage: the registry (§4.A Store) and its crash-safe snapshot
//! persistence.

mod persist;
mod snapshot;
mod store;

pub use persist::{load_or_default, persist_now};
pub use snapshot::{Snapshot, SnapshotError};
pub use store::{Registry, RepoSettings, Store};
