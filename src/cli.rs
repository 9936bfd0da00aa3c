//! Command-line interface for goban.

use clap::{Parser, Subcommand};

/// Goban - authoritative two-player Go server over a line protocol
#[derive(Parser, Debug)]
#[command(name = "goban")]
#[command(about = "Networked two-player Go", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "55555")]
        port: u16,

        /// Board dimension (N for an NxN board)
        #[arg(long, default_value = "9")]
        board_size: usize,
    },

    /// Connect to a server as a console player
    Play {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "55555")]
        port: u16,
    },
}
