//! Goban - Unified CLI
//!
//! One binary for both sides of the wire: the authoritative server and the
//! console client.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            board_size,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();
            info!(%host, port, board_size, "Starting goban server");
            goban::server::run(&host, port, board_size).await
        }
        Command::Play { host, port } => {
            // The console is the UI; keep log noise out of it by default.
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .init();
            goban::client::run(&host, port).await
        }
    }
}
