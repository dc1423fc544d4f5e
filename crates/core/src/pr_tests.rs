// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn t(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn sample(fetched_at: SystemTime) -> Pr {
    Pr {
        id: PrId::new("acme/widgets", 42),
        repo: "acme/widgets".to_string(),
        number: 42,
        title: "Add frobnicator".to_string(),
        url: "https://github.com/acme/widgets/pull/42".to_string(),
        author: "octocat".to_string(),
        head_branch: "feature/frob".to_string(),
        base_branch: "main".to_string(),
        status: PrStatus::Open,
        checks_status: None,
        fetched_at,
        muted: false,
    }
}

#[test]
fn pr_id_round_trips_through_parse() {
    let id = PrId::new("acme/widgets", 42);
    assert_eq!(id.as_str(), "acme/widgets#42");
    assert_eq!(id.parse(), Some(("acme/widgets", 42)));
}

#[test]
fn pr_id_serializes_as_plain_string() {
    let id = PrId::new("acme/widgets", 7);
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"acme/widgets#7\"");
}

#[test]
fn needs_refresh_false_within_ttl() {
    let pr = sample(t(0));
    assert!(!pr.needs_refresh(t(89)));
}

#[test]
fn needs_refresh_true_past_ttl() {
    let pr = sample(t(0));
    assert!(pr.needs_refresh(t(90)));
}

#[test]
fn refresh_updates_status_and_fetched_at() {
    let mut pr = sample(t(0));
    pr.refresh(PrStatus::Merged, Some("success".to_string()), t(200));
    assert_eq!(pr.status, PrStatus::Merged);
    assert_eq!(pr.checks_status.as_deref(), Some("success"));
    assert_eq!(pr.fetched_at, t(200));
    assert!(!pr.needs_refresh(t(289)));
}
