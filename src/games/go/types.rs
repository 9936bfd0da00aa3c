//! Core domain types for Go.

use derive_new::new;
use serde::{Deserialize, Serialize};

/// Stone color. Player 1 plays black, player 2 plays white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    /// Black stones (player 1, rendered `X`).
    Black,
    /// White stones (player 2, rendered `O`).
    White,
}

impl Stone {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Wire-level player id (1 for black, 2 for white).
    pub fn id(self) -> u8 {
        match self {
            Stone::Black => 1,
            Stone::White => 2,
        }
    }

    /// Maps a wire-level player id back to a color.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Stone::Black),
            2 => Some(Stone::White),
            _ => None,
        }
    }
}

/// A single intersection on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Point {
    /// No stone.
    Empty,
    /// A stone of the given color.
    Occupied(Stone),
}

impl Point {
    /// Wire-level cell value: 0 empty, 1 black, 2 white.
    pub fn id(self) -> u8 {
        match self {
            Point::Empty => 0,
            Point::Occupied(stone) => stone.id(),
        }
    }

    /// Maps a wire-level cell value back to a point.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Point::Empty),
            _ => Stone::from_id(id).map(Point::Occupied),
        }
    }
}

/// A candidate placement, constructed once per `MOVE` command.
///
/// Coordinates are signed so that out-of-range input decodes cleanly and gets
/// rejected by the rules rather than by the codec. The `player` field is
/// overwritten with the connection's authenticated id before the move reaches
/// the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Move {
    /// Target row, 0-based from the top.
    pub row: i32,
    /// Target column, 0-based from the left.
    pub col: i32,
    /// Wire-level player id (1 or 2).
    pub player: u8,
}
