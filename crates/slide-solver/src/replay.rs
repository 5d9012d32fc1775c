//! Stepping a board through a move path.
//!
//! Callers animating a solution pull one step at a time from [`Replay`] and
//! pace it however they like; nothing here sleeps or schedules.

use crate::board::{Board, Move, MovePath};
use crate::error::OutOfBoundsError;

/// Apply every move of `path` to `initial`.
pub fn replay(initial: &Board, path: &MovePath) -> Result<Board, OutOfBoundsError> {
    path.iter()
        .try_fold(initial.clone(), |board, &mv| board.apply_move(mv))
}

/// Iterator over `(move, board after the move)` pairs.
///
/// Yields an error and then stops if a move would leave the board.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    current: Board,
    moves: std::slice::Iter<'a, Move>,
    failed: bool,
}

impl<'a> Replay<'a> {
    pub fn new(initial: &Board, path: &'a MovePath) -> Self {
        Self {
            current: initial.clone(),
            moves: path.iter(),
            failed: false,
        }
    }

    /// Board after the last yielded step.
    pub fn current(&self) -> &Board {
        &self.current
    }
}

impl Iterator for Replay<'_> {
    type Item = Result<(Move, Board), OutOfBoundsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let &mv = self.moves.next()?;
        match self.current.apply_move(mv) {
            Ok(next) => {
                self.current = next.clone();
                Some(Ok((mv, next)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
