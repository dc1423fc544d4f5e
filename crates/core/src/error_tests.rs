// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn code_maps_each_variant() {
    assert_eq!(AttnError::NotFound("x".into()).code(), "not_found");
    assert_eq!(AttnError::InvalidArgument("x".into()).code(), "invalid_argument");
    assert_eq!(AttnError::Conflict("x".into()).code(), "conflict");
    assert_eq!(
        AttnError::External(anyhow::anyhow!("boom")).code(),
        "external_error"
    );
    assert_eq!(AttnError::Cancelled.code(), "cancelled");
    assert_eq!(AttnError::Internal("x".into()).code(), "internal_error");
}

#[test]
fn display_includes_message() {
    let err = AttnError::NotFound("session sess-1".into());
    assert_eq!(err.to_string(), "not found: session sess-1");
}
