//! TCP acceptor: one connection handler per incoming socket.

use crate::connection;
use crate::session::{self, SessionHandle};
use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Binds the listener, spawns the session actor, and serves forever.
pub async fn run(host: &str, port: u16, board_size: usize) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    let session = session::spawn(board_size);
    serve(listener, session).await
}

/// Accept loop over an already-bound listener.
///
/// The roster cap is not enforced here: extra connections are accepted and
/// turned away by the session at registration. Accept errors are logged and
/// the loop keeps going; nothing here is fatal to the process.
pub async fn serve(listener: TcpListener, session: SessionHandle) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Listening for players");

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                info!(%peer, "Accepted connection");
                tokio::spawn(connection::handle(stream, peer, session.clone()));
            }
            Err(e) => {
                warn!(error = %e, "Accept failed");
            }
        }
    }
}
