// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error taxonomy (§7 Error handling).
//!
//! Every fallible operation in `attn-*` returns one of these variants so the
//! command router can map errors to wire error codes without guessing at
//! intent from a string.

use thiserror::Error;

/// Error taxonomy shared by the engine, storage, and adapter crates.
///
/// Variant choice is deliberate, not decorative: `NotFound` vs `Conflict`
/// vs `InvalidArgument` determine the wire error `code` the command router
/// sends back (§6 Errors).
#[derive(Debug, Error)]
pub enum AttnError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// A collaborator outside the daemon's control failed: git, GitHub,
    /// the classifier, the chat platform, or the reviewer.
    #[error("external collaborator failed: {0}")]
    External(#[source] anyhow::Error),

    #[error("cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AttnError {
    /// Stable wire error code for the command router (§6 Errors).
    pub fn code(&self) -> &'static str {
        match self {
            AttnError::NotFound(_) => "not_found",
            AttnError::InvalidArgument(_) => "invalid_argument",
            AttnError::Conflict(_) => "conflict",
            AttnError::External(_) => "external_error",
            AttnError::Cancelled => "cancelled",
            AttnError::Internal(_) => "internal_error",
        }
    }
}

pub type AttnResult<T> = Result<T, AttnError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
