//! Wire vocabulary: inbound command lines and outbound notification lines.
//!
//! One command or notification per newline-terminated line. Inbound keywords
//! are case-insensitive; everything after the first whitespace run is the
//! payload.

use crate::codec;
use crate::error::ProtocolError;
use crate::games::go::{Board, Move};
use std::str::FromStr;
use strum::EnumString;

/// Recognized inbound keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Keyword {
    Move,
    Pass,
    Resign,
}

/// A parsed client command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Attempt a placement.
    Move(Move),
    /// Pass the turn.
    Pass,
    /// Forfeit the match.
    Resign,
}

/// Parses one trimmed, non-empty inbound line.
pub fn parse_command(line: &str) -> Result<Command, ProtocolError> {
    let (keyword, payload) = match line.split_once(char::is_whitespace) {
        Some((k, rest)) => (k, rest.trim()),
        None => (line, ""),
    };

    match Keyword::from_str(keyword) {
        Ok(Keyword::Move) => {
            if payload.is_empty() {
                return Err(ProtocolError::MissingPayload);
            }
            codec::decode_move(payload).map(Command::Move)
        }
        Ok(Keyword::Pass) => Ok(Command::Pass),
        Ok(Keyword::Resign) => Ok(Command::Resign),
        Err(_) => Err(ProtocolError::UnknownCommand(keyword.to_uppercase())),
    }
}

/// A server → client notification line.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Assigns the connection's player id at match start.
    Start(u8),
    /// Full board state.
    Board(Board),
    /// The receiving player is to move.
    YourTurn,
    /// The opponent is to move.
    OpponentTurn,
    /// Informational message (captures, passes, greetings).
    Info(String),
    /// Rejection or connectivity notice.
    Error(String),
    /// Terminal notice with the reason the match ended.
    GameOver(String),
}

impl Notice {
    /// Renders the notification as one wire line (without the newline).
    pub fn to_line(&self) -> String {
        match self {
            Notice::Start(id) => format!("START {id}"),
            Notice::Board(board) => format!("BOARD {}", codec::encode_board(board)),
            Notice::YourTurn => "YOUR_TURN".into(),
            Notice::OpponentTurn => "OPPONENT_TURN".into(),
            Notice::Info(msg) => format!("INFO {msg}"),
            Notice::Error(msg) => format!("ERROR {msg}"),
            Notice::GameOver(msg) => format!("GAME_OVER {msg}"),
        }
    }

    /// Parses a server line, for the client side.
    ///
    /// Returns `None` for unrecognized lines; clients treat those as
    /// non-fatal and display them raw.
    pub fn parse(line: &str) -> Option<Notice> {
        if let Some(rest) = line.strip_prefix("START ") {
            return rest.trim().parse().ok().map(Notice::Start);
        }
        if let Some(rest) = line.strip_prefix("BOARD ") {
            return codec::decode_board(rest.trim()).ok().map(Notice::Board);
        }
        match line {
            "YOUR_TURN" => return Some(Notice::YourTurn),
            "OPPONENT_TURN" => return Some(Notice::OpponentTurn),
            _ => {}
        }
        if let Some(rest) = line.strip_prefix("INFO ") {
            return Some(Notice::Info(rest.to_string()));
        }
        if let Some(rest) = line.strip_prefix("ERROR ") {
            return Some(Notice::Error(rest.to_string()));
        }
        if let Some(rest) = line.strip_prefix("GAME_OVER") {
            return Some(Notice::GameOver(rest.trim().to_string()));
        }
        None
    }
}
