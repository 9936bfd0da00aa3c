//! Line-text codec for move and board payloads.
//!
//! Moves travel as `{"row":R,"col":C,"player":P}`, boards as
//! `{"size":N,"grid":[[0|1|2,...],...]}`. Both round-trip losslessly; the
//! session and the console client share this module.

use crate::error::ProtocolError;
use crate::games::go::{Board, Move};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct BoardWire {
    size: usize,
    grid: Vec<Vec<u8>>,
}

/// Encodes a move as a single-line JSON payload.
pub fn encode_move(mov: &Move) -> String {
    serde_json::json!({ "row": mov.row, "col": mov.col, "player": mov.player }).to_string()
}

/// Decodes a move payload.
pub fn decode_move(payload: &str) -> Result<Move, ProtocolError> {
    serde_json::from_str(payload).map_err(|e| ProtocolError::BadMovePayload(e.to_string()))
}

/// Encodes a board as a single-line JSON payload.
pub fn encode_board(board: &Board) -> String {
    serde_json::json!({ "size": board.size(), "grid": board.to_rows() }).to_string()
}

/// Decodes a board payload.
pub fn decode_board(payload: &str) -> Result<Board, ProtocolError> {
    let wire: BoardWire =
        serde_json::from_str(payload).map_err(|e| ProtocolError::BadBoardPayload(e.to_string()))?;
    if wire.grid.len() != wire.size {
        return Err(ProtocolError::BadBoardPayload(format!(
            "grid has {} rows, expected {}",
            wire.grid.len(),
            wire.size
        )));
    }
    Board::try_from_rows(wire.grid)
        .ok_or_else(|| ProtocolError::BadBoardPayload("grid is not square 0/1/2 cells".into()))
}
