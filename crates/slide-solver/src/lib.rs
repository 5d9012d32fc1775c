//! A* solver for N×N sliding-tile puzzles.
//!
//! Given a scrambled board and a goal board, [`solve`] returns the shortest
//! sequence of blank moves (`U`, `D`, `L`, `R`) that turns one into the other.
//! The UI, shuffling and playback pacing live with the caller; this crate only
//! validates boards, searches, and replays paths.

pub mod board;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod replay;
pub mod solver;

// Re-export main types
pub use board::{canonical_key, is_reachable, Board, Move, MovePath, StateKey};
pub use error::{
    EmptyFrontierError, InvalidStateError, OutOfBoundsError, ParseMoveError, SolveError,
};
pub use frontier::{Frontier, VisitedSet};
pub use heuristic::{GoalIndex, HeuristicKind};
pub use node::{expand, SearchNode};
pub use replay::{replay, Replay};
pub use solver::{SearchStats, Solution, Solver, SolverConfig, SolverPhase};

/// Shortest blank-move path from `initial` to `goal`, both given as rows.
///
/// Both grids are validated before any search work starts.
pub fn solve(initial: Vec<Vec<u32>>, goal: Vec<Vec<u32>>) -> Result<MovePath, SolveError> {
    let initial = Board::from_rows(initial)?;
    let goal = Board::from_rows(goal)?;
    Ok(Solver::new(initial, goal)?.run()?.path)
}

/// Move the blank of `grid` one step in `direction`.
pub fn apply_move(grid: Vec<Vec<u32>>, direction: Move) -> Result<Vec<Vec<u32>>, SolveError> {
    let board = Board::from_rows(grid)?;
    Ok(board.apply_move(direction)?.to_rows())
}
