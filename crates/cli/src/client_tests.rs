// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use attn_daemon::wire;
use serial_test::serial;
use tempfile::tempdir;

fn with_state_dir<T>(f: impl FnOnce(&std::path::Path) -> T) -> T {
    let dir = tempdir().unwrap();
    std::env::set_var("ATTN_STATE_DIR", dir.path());
    let result = f(dir.path());
    std::env::remove_var("ATTN_STATE_DIR");
    result
}

#[test]
#[serial]
fn connect_fails_when_no_socket_is_present() {
    with_state_dir(|_dir| {
        let err = DaemonClient::connect().expect_err("no daemon should be running");
        assert!(matches!(err, ClientError::DaemonNotRunning));
    });
}

#[tokio::test]
#[serial]
async fn send_round_trips_a_command_over_a_real_unix_socket() {
    with_state_dir(|dir| async move {
        let socket_path = dir.join("daemon.sock");
        let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let (mut reader, mut writer) = stream.split();
            let _cmd: Command = wire::read_message(&mut reader).await.unwrap();
            wire::write_message(&mut writer, &SocketReply::ok()).await.unwrap();
        });

        let client = DaemonClient::connect().expect("socket file exists");
        let reply = client
            .send(&Command::Register {
                id: attn_core::SessionId::new("sess-1"),
                label: "drumstick".into(),
                agent: attn_core::AgentKind::Claude,
                directory: std::path::PathBuf::from("/home/user/project"),
            })
            .await
            .expect("the mock daemon replies");

        assert!(reply.ok);
    }.await)
}

#[test]
#[serial]
fn stop_returns_false_when_the_lock_file_is_absent() {
    with_state_dir(|dir| {
        let socket_path = dir.join("daemon.sock");
        std::fs::write(&socket_path, b"placeholder").unwrap();
        let client = DaemonClient::connect().expect("socket file exists");

        let stopped = tokio::runtime::Runtime::new().unwrap().block_on(client.stop());

        assert!(!stopped);
    });
}
