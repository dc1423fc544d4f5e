// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glue between [`Store`] and [`Snapshot`]: best-effort load on startup,
//! on-demand save for the daemon's periodic persistence tick (§4.A, §4.J).

use crate::snapshot::{Snapshot, SnapshotError};
use crate::store::Store;
use std::path::Path;

/// Snapshot `store` and write it to `path`, atomically.
pub fn persist_now(store: &Store, path: &Path) -> Result<(), SnapshotError> {
    Snapshot::new(store.snapshot()).save(path)
}

/// Best-effort load: construct an empty `Store` if nothing usable is on
/// disk, rather than failing startup (§4.A "best-effort load").
pub fn load_or_default(path: &Path) -> Store {
    match Snapshot::load(path) {
        Ok(Some(snapshot)) => Store::from_registry(snapshot.registry),
        Ok(None) => Store::new(),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "failed to load snapshot, starting with an empty store");
            Store::new()
        }
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
