// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hp-remote: WebSocket remote store for hall pass stations.
//!
//! Holds the tenant-scoped canonical `passes` and `students` rows and tells
//! subscribed stations when a tenant's passes change.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// hp-remote: Hall pass remote store
#[derive(Parser, Debug)]
#[command(name = "hp-remote")]
#[command(about = "WebSocket remote store for hall pass stations")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the passes database
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting hp-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::new(&args.data)?;

    server::run(args.bind, state).await?;

    Ok(())
}
