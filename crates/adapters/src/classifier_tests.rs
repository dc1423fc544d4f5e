// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

fn write_script(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("classify.sh");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "#!/bin/sh\n{body}").unwrap();
    let mut perms = f.metadata().unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn script_classifier_parses_working_verdict() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "echo working");
    let classifier = ScriptClassifier::new(script);
    let verdict = classifier
        .classify("some transcript", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(verdict, SessionState::Working);
}

#[tokio::test]
async fn script_classifier_rejects_unknown_verdict() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "echo bogus");
    let classifier = ScriptClassifier::new(script);
    let result = classifier.classify("x", Duration::from_secs(5)).await;
    assert!(matches!(result, Err(ClassifierError::MalformedOutput(_))));
}

#[tokio::test]
async fn script_classifier_times_out() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "sleep 5 && echo working");
    let classifier = ScriptClassifier::new(script);
    let result = classifier
        .classify("x", Duration::from_millis(50))
        .await;
    assert!(matches!(result, Err(ClassifierError::Timeout)));
}

#[tokio::test]
async fn fake_classifier_returns_queued_verdicts() {
    let fake = FakeClassifier::new();
    fake.push_verdict(SessionState::Idle);
    let verdict = fake.classify("x", Duration::from_secs(1)).await.unwrap();
    assert_eq!(verdict, SessionState::Idle);
}

#[tokio::test]
async fn fake_classifier_returns_verdicts_in_fifo_order() {
    let fake = FakeClassifier::new();
    fake.push_verdict(SessionState::Working);
    fake.push_verdict(SessionState::Idle);
    assert_eq!(
        fake.classify("x", Duration::from_secs(1)).await.unwrap(),
        SessionState::Working
    );
    assert_eq!(
        fake.classify("x", Duration::from_secs(1)).await.unwrap(),
        SessionState::Idle
    );
}
