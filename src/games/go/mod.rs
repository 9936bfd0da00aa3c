//! Go rule engine: board state, capture resolution, suicide detection, and
//! position snapshots.

mod board;
mod types;

pub use board::Board;
pub use types::{Move, Point, Stone};
