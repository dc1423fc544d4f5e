// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `attn`: a thin client for `attnd`.
//!
//! Dials the daemon's Unix socket, sends one [`attn_core::Command`] built
//! from its JSON text, and prints the [`attn_core::SocketReply`] JSON to
//! stdout. Rich argument parsing and output rendering are out of scope
//! (§1) — this exists so the daemon has something to exercise it in
//! development and in the integration tests.

mod client;
mod daemon_process;
mod env;

use anyhow::{bail, Context, Result};
use attn_core::Command;
use clap::{Parser, Subcommand};
use client::DaemonClient;

#[derive(Parser)]
#[command(name = "attn", version, about = "Thin client for the attn daemon")]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Start `attnd` in the background if it isn't already running.
    Start,
    /// Stop a running `attnd`.
    Stop,
    /// Print the daemon socket path and whether it is reachable.
    Status,
    /// Send a single command (as JSON) and print the reply (as JSON).
    ///
    /// The JSON is the tagged `Command` shape, e.g.
    /// `{"cmd":"query","filter":""}`. Reads from stdin when `json` is `-`.
    Send { json: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.action {
        Action::Start => run_start().await,
        Action::Stop => run_stop().await,
        Action::Status => run_status().await,
        Action::Send { json } => run_send(json).await,
    }
}

async fn run_start() -> Result<()> {
    let client = DaemonClient::connect_or_start().context("starting attnd")?;
    println!("attnd ready at {}", client.socket_path().display());
    Ok(())
}

async fn run_stop() -> Result<()> {
    let client = DaemonClient::connect().context("connecting to attnd")?;
    if client.stop().await {
        println!("attnd stopped");
    } else {
        println!("attnd was not running");
    }
    Ok(())
}

async fn run_status() -> Result<()> {
    match DaemonClient::connect() {
        Ok(client) => println!("attnd reachable at {}", client.socket_path().display()),
        Err(client::ClientError::DaemonNotRunning) => println!("attnd is not running"),
        Err(err) => return Err(err).context("connecting to attnd"),
    }
    Ok(())
}

async fn run_send(json: String) -> Result<()> {
    let text = if json == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading command from stdin")?;
        buf
    } else {
        json
    };

    let command: Command = serde_json::from_str(&text).context("parsing command JSON")?;
    let client = DaemonClient::connect_or_start().context("connecting to attnd")?;
    let reply = client.send(&command).await.context("sending command")?;

    let rendered = serde_json::to_string_pretty(&reply).context("rendering reply")?;
    println!("{rendered}");

    if !reply.ok {
        bail!(reply.error.unwrap_or_else(|| "command failed".to_string()));
    }
    Ok(())
}
