//! Error taxonomy for the goban server.
//!
//! Three families, mirroring where each failure is handled:
//! - [`RuleViolation`]: a command that breaks the rules of play. Recovered at
//!   the session boundary and reported to the offending connection only.
//! - [`SessionError`]: session-level failures outside the rules (full roster,
//!   session not running).
//! - [`ProtocolError`]: malformed input caught before the session is ever
//!   contacted.
//!
//! None of these are fatal to the server process.

use derive_more::{Display, Error};

/// A move or command that violates the rules of the game.
///
/// The display strings double as the wire-level `ERROR` messages, so they are
/// phrased for the player on the other end of the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RuleViolation {
    /// Placement outside the board.
    #[display("Point out of bounds")]
    OutOfBounds,
    /// Placement on a non-empty point.
    #[display("Point already occupied")]
    Occupied,
    /// Placement that leaves the placing group with zero liberties while
    /// capturing nothing.
    #[display("Suicide move not allowed")]
    Suicide,
    /// Move that would exactly recreate the ko reference position.
    #[display("Ko rule: immediate recapture not allowed")]
    KoViolation,
    /// Command from the player whose turn it is not.
    #[display("Not your turn")]
    NotYourTurn,
    /// Move payload claiming a different player id than the requester.
    #[display("Player id mismatch")]
    PlayerIdMismatch,
    /// Command arriving after the match reached its terminal state.
    #[display("Game already finished")]
    GameAlreadyFinished,
}

/// Session-level failures outside the rules of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Registration attempt when two players are already seated.
    #[display("Server already has two players")]
    RosterFull,
    /// The session command queue is gone (actor not running or shut down).
    #[display("Session is not running")]
    NotInitialized,
}

/// Malformed input at the protocol boundary.
///
/// Produced by the connection handler before the session is contacted; the
/// offending line never reaches shared state.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// Keyword that is not `MOVE`, `PASS`, or `RESIGN`.
    #[display("Unknown command: [{_0}]")]
    UnknownCommand(#[error(not(source))] String),
    /// `MOVE` with no payload.
    #[display("MOVE requires a payload")]
    MissingPayload,
    /// Payload that does not decode as a move.
    #[display("Bad move payload: {_0}")]
    BadMovePayload(#[error(not(source))] String),
    /// Payload that does not decode as a board.
    #[display("Bad board payload: {_0}")]
    BadBoardPayload(#[error(not(source))] String),
}
