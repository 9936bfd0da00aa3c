//! Board engine: placement validity, liberty computation, group capture,
//! suicide detection, and snapshot/restore.
//!
//! The board is pure rule logic. Turn order, ko bookkeeping, and everything
//! connection-shaped lives in the session.

use super::types::{Point, Stone};
use crate::error::RuleViolation;
use std::fmt;
use tracing::instrument;

/// An N×N Go board.
///
/// Cells are stored flat in row-major order. Structural equality (`==`)
/// compares size and every cell, which is what ko detection relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Point>,
}

/// Orthogonal neighbors of a flat index, clipped to the board.
///
/// Free function rather than a method so capture removal can walk neighbors
/// while mutating cells.
fn neighbors(size: usize, idx: usize) -> impl Iterator<Item = usize> {
    let (row, col) = (idx / size, idx % size);
    [
        (row.wrapping_sub(1), col),
        (row + 1, col),
        (row, col.wrapping_sub(1)),
        (row, col + 1),
    ]
    .into_iter()
    .filter(move |&(r, c)| r < size && c < size)
    .map(move |(r, c)| r * size + c)
}

impl Board {
    /// Creates an empty board of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Point::Empty; size * size],
        }
    }

    /// Board dimension (the N of the N×N grid).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the point at the given coordinates, or `None` out of bounds.
    pub fn point(&self, row: i32, col: i32) -> Option<Point> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// Attempts a placement, resolving captures.
    ///
    /// On success returns the number of enemy stones captured (possibly 0)
    /// with the grid left in its new state. On any rejection the grid is
    /// exactly its pre-call state.
    ///
    /// Capture resolution runs before the suicide check: a placement that
    /// leaves its own group without liberties is legal when it captured,
    /// since removal of the adjacent enemy group frees a liberty.
    #[instrument(skip(self))]
    pub fn apply(&mut self, row: i32, col: i32, stone: Stone) -> Result<usize, RuleViolation> {
        let idx = self.index(row, col).ok_or(RuleViolation::OutOfBounds)?;
        if self.cells[idx] != Point::Empty {
            return Err(RuleViolation::Occupied);
        }

        self.cells[idx] = Point::Occupied(stone);

        let enemy = stone.opponent();
        let mut captured = 0;
        for n in neighbors(self.size, idx) {
            if self.cells[n] == Point::Occupied(enemy) && !self.group_has_liberty(n) {
                captured += self.remove_group(n, enemy);
            }
        }

        if captured == 0 && !self.group_has_liberty(idx) {
            // Suicide: revert the placement.
            self.cells[idx] = Point::Empty;
            return Err(RuleViolation::Suicide);
        }

        Ok(captured)
    }

    /// Whether the group containing `start` reaches at least one empty point.
    ///
    /// Iterative flood fill over same-colored stones with an explicit stack;
    /// traversal depth scales with group size, so no recursion.
    fn group_has_liberty(&self, start: usize) -> bool {
        let color = match self.cells[start] {
            Point::Occupied(stone) => stone,
            Point::Empty => return true,
        };

        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(idx) = stack.pop() {
            for n in neighbors(self.size, idx) {
                match self.cells[n] {
                    Point::Empty => return true,
                    Point::Occupied(s) if s == color && !visited[n] => {
                        visited[n] = true;
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }
        false
    }

    /// Removes the whole group of `color` containing `start`.
    ///
    /// Returns the number of stones removed. Cells are emptied as they are
    /// pushed, which doubles as the visited marker.
    fn remove_group(&mut self, start: usize, color: Stone) -> usize {
        let mut removed = 0;
        let mut stack = vec![start];
        self.cells[start] = Point::Empty;

        while let Some(idx) = stack.pop() {
            removed += 1;
            for n in neighbors(self.size, idx) {
                if self.cells[n] == Point::Occupied(color) {
                    self.cells[n] = Point::Empty;
                    stack.push(n);
                }
            }
        }
        removed
    }

    /// Deep copy of the current position, for rollback and ko comparison.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Overwrites the grid from a snapshot of the same dimensions.
    pub fn restore(&mut self, snapshot: &Board) {
        if snapshot.size != self.size {
            tracing::warn!(
                expected = self.size,
                got = snapshot.size,
                "Ignoring restore from mismatched snapshot"
            );
            return;
        }
        self.cells.copy_from_slice(&snapshot.cells);
    }

    /// Grid contents as wire-level rows (0 empty, 1 black, 2 white).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|p| p.id()).collect())
            .collect()
    }

    /// Rebuilds a board from wire-level rows.
    ///
    /// Returns `None` unless the grid is square with cell values in 0..=2.
    pub fn try_from_rows(rows: Vec<Vec<u8>>) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in &rows {
            if row.len() != size {
                return None;
            }
            for &cell in row {
                cells.push(Point::from_id(cell)?);
            }
        }
        Some(Self { size, cells })
    }
}

impl fmt::Display for Board {
    /// Indexed ASCII rendering: `.` empty, `X` black, `O` white.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for col in 0..self.size {
            write!(f, "{col:2}")?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{row:2}: ")?;
            for col in 0..self.size {
                let ch = match self.cells[row * self.size + col] {
                    Point::Empty => '.',
                    Point::Occupied(Stone::Black) => 'X',
                    Point::Occupied(Stone::White) => 'O',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
