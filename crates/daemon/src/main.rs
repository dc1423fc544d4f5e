// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! attn daemon (attnd)
//!
//! Background process owning the session registry, the PR sidebar, and
//! the review/worktree orchestration, reachable over a Unix socket and a
//! WebSocket endpoint. Started by the `attn` CLI; not meant to be run
//! interactively.

use attn_adapters::{
    Classifier, CliGitAdapter, GitHubAdapter, NoOpChatAdapter, NoOpGitHubAdapter, NoOpPtyAdapter,
    ReqwestGitHubAdapter, Reviewer, ScriptClassifier, ScriptReviewer,
};
use attn_daemon::transport::{unix, ws};
use attn_daemon::{config::Config, daemon::Daemon, env, error::DaemonError, lock::LockFile};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("attnd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("attnd {}", env!("CARGO_PKG_VERSION"));
                println!("attn daemon - background process for session tracking and review");
                println!();
                println!("USAGE:");
                println!("    attnd");
                println!();
                println!("The daemon is typically started by the `attn` CLI and should not");
                println!("be invoked directly. It listens on a Unix socket and a WebSocket");
                println!("endpoint for commands.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: attnd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    rotate_log_if_needed(&config.log_path);
    write_startup_marker(&config)?;
    let log_guard = setup_logging(&config)?;

    let _lock = match LockFile::acquire(&config.lock_path) {
        Ok(lock) => lock,
        Err(DaemonError::AlreadyRunning(pid)) => {
            eprintln!("attnd is already running");
            if pid != 0 {
                eprintln!("  pid: {pid}");
            }
            drop(log_guard);
            std::process::exit(1);
        }
        Err(err) => {
            error!(error = %err, "failed to acquire daemon lock");
            drop(log_guard);
            return Err(err.into());
        }
    };

    let daemon_id = attn_daemon::daemon_id::ensure_daemon_id(&config.daemon_id_path)?;
    info!(daemon_id = %daemon_id, "starting attn daemon");

    let unix_listener = unix::bind(&config.socket_path)?;

    let git = Arc::new(CliGitAdapter::new());
    let github: Arc<dyn GitHubAdapter> = match ReqwestGitHubAdapter::from_env() {
        Ok(adapter) => Arc::new(adapter),
        Err(err) => {
            info!(error = %err, "no GitHub token configured, PR features disabled");
            Arc::new(NoOpGitHubAdapter)
        }
    };
    let pty = Arc::new(NoOpPtyAdapter);
    let classifier: Arc<dyn Classifier> = Arc::new(ScriptClassifier::new(env::classifier_script_path()));
    let reviewer: Arc<dyn Reviewer> = Arc::new(ScriptReviewer::new(env::reviewer_script_path()));
    // Chat-platform monitor starts lazily on first subscription; no
    // subscription command exists on the wire yet (§6), so it is never
    // driven beyond this point.
    let _chat = NoOpChatAdapter;

    let daemon = Daemon::new(config.clone(), git, github, pty, classifier, reviewer);
    daemon.start_background_tasks();

    let ws_state = ws::WsState { router: daemon.router.clone(), hub: daemon.hub.clone() };
    let ws_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), env::ws_port());
    let ws_shutdown = daemon.shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = ws::serve(ws_addr, ws_state, ws_shutdown).await {
            error!(error = %err, "websocket server exited");
        }
    });

    let unix_router = daemon.router.clone();
    let unix_shutdown = daemon.shutdown.clone();
    tokio::spawn(unix::run(unix_listener, unix_router, unix_shutdown));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        socket = %config.socket_path.display(),
        ws_addr = %ws_addr,
        "daemon ready",
    );
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    daemon.stop().await;
    let _ = std::fs::remove_file(&config.socket_path);
    info!("daemon stopped");
    drop(log_guard);
    Ok(())
}

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the daemon log file if it exceeds [`MAX_LOG_SIZE`]. Best-effort:
/// rotation failures are silently ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

const STARTUP_MARKER_PREFIX: &str = "--- attnd: starting (pid: ";

fn write_startup_marker(config: &Config) -> std::io::Result<()> {
    use std::io::Write;
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    writeln!(file, "{}{}) ---\n", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn setup_logging(config: &Config) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let log_dir = config.log_path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let log_name = config.log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log"));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
