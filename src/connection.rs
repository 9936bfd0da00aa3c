//! Per-player protocol front end.
//!
//! Each accepted socket gets two tasks: a writer draining the player's
//! outbound line channel, and this reader loop blocking on newline-terminated
//! input. Malformed lines are answered directly without contacting the
//! session; well-formed commands go onto the session queue with the move's
//! player id overridden by the connection's authenticated id, so a payload
//! cannot speak for the other player.

use crate::protocol::{self, Command, Notice};
use crate::session::{SessionCommand, SessionHandle};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Drives one client connection until EOF, read error, or roster rejection.
#[instrument(skip(stream, session), fields(%peer))]
pub async fn handle(stream: TcpStream, peer: SocketAddr, session: SessionHandle) {
    let (read_half, write_half) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_lines(write_half, rx));

    let player = match session.register(tx.clone()).await {
        Ok(player) => player,
        Err(e) => {
            info!(%peer, error = %e, "Turning connection away");
            let _ = tx.send(Notice::Error(e.to_string()).to_line());
            drop(tx);
            let _ = writer.await;
            return;
        }
    };
    info!(%peer, player, "Player connected");

    let mut lines = BufReader::new(read_half).lines();
    loop {
        let raw = match lines.next_line().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(player, "Client closed connection");
                break;
            }
            Err(e) => {
                warn!(player, error = %e, "Read failed, dropping connection");
                break;
            }
        };
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let command = match protocol::parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                debug!(player, line, error = %e, "Rejecting malformed line");
                let _ = tx.send(Notice::Error(e.to_string()).to_line());
                continue;
            }
        };

        let command = match command {
            Command::Move(mut mov) => {
                // The payload's player field is untrusted input.
                mov.player = player;
                SessionCommand::Move { player, mov }
            }
            Command::Pass => SessionCommand::Pass { player },
            Command::Resign => SessionCommand::Resign { player },
        };
        if session.send(command).is_err() {
            warn!(player, "Session gone, dropping connection");
            break;
        }
    }

    let _ = session.send(SessionCommand::Disconnect { player });
    drop(tx);
    let _ = writer.await;
}

/// Writes queued lines to the socket until the channel closes or a write
/// fails. A failed write only ends this connection; the disconnect reaches
/// the session through the reader side.
async fn write_lines(mut writer: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        let framed = format!("{line}\n");
        if let Err(e) = writer.write_all(framed.as_bytes()).await {
            debug!(error = %e, "Write failed, stopping writer");
            break;
        }
    }
}
