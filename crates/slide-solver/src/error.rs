//! Error types for board construction, move application and search.
//!
//! Every failure is returned as a value. Callers presenting a "Solve" action
//! can tell an invalid puzzle, an unreachable goal and an exceeded budget apart
//! by matching on [`SolveError`].

use thiserror::Error;

use crate::board::Move;

/// A grid that is not a valid N×N permutation of `0..N²`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    /// The grid has no rows (or no cells).
    #[error("grid is empty")]
    Empty,

    /// A row's length differs from the number of rows.
    #[error("row {row} has {len} cells, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// The number of rows in the grid.
        expected: usize,
    },

    /// A flat cell list whose length is not N² for any N.
    #[error("{count} cells cannot form a square grid")]
    NotAPerfectSquare {
        /// Number of cells supplied.
        count: usize,
    },

    /// A value outside `0..N²`.
    #[error("value {value} is out of range (max {max})")]
    ValueOutOfRange {
        /// The offending value.
        value: u32,
        /// Largest permitted value, `N² - 1`.
        max: u32,
    },

    /// A value that appears more than once.
    #[error("value {value} appears more than once")]
    Duplicate {
        /// The repeated value.
        value: u32,
    },

    /// No cell holds `0`.
    #[error("grid has no blank cell (0)")]
    MissingBlank,

    /// A token in a flat string that is not an unsigned integer.
    #[error("cannot parse {token:?} as a tile value")]
    Parse {
        /// The offending token.
        token: String,
    },
}

/// A single-step move that would push the blank off the board.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot move blank {direction:?} from ({row}, {col}) on a {size}x{size} board")]
pub struct OutOfBoundsError {
    pub direction: Move,
    pub row: usize,
    pub col: usize,
    pub size: usize,
}

/// A path symbol that is not one of `U`, `D`, `L`, `R`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid move symbol {0:?}")]
pub struct ParseMoveError(pub char);

/// `pop_min` on a frontier with nothing in it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("frontier is empty")]
pub struct EmptyFrontierError;

/// Why a solve did not produce a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The initial or goal grid is malformed. Rejected before any search work.
    #[error("invalid puzzle state: {0}")]
    InvalidState(#[from] InvalidStateError),

    /// Initial and goal boards have different dimensions.
    #[error("initial board is {initial}x{initial} but goal is {goal}x{goal}")]
    SizeMismatch {
        /// Size of the initial board.
        initial: usize,
        /// Size of the goal board.
        goal: usize,
    },

    /// A replayed move left the board.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBoundsError),

    /// The frontier emptied without reaching the goal: no path exists.
    #[error("search exhausted after {expanded} expansions without reaching the goal")]
    Exhausted {
        /// Nodes expanded before giving up.
        expanded: usize,
    },

    /// The expansion or time budget ran out. The answer is unknown.
    #[error("search budget exceeded after {expanded} expansions")]
    Timeout {
        /// Nodes expanded before the budget ran out.
        expanded: usize,
    },
}

impl SolveError {
    /// Short machine-readable tag, used in the CLI report.
    pub fn reason(&self) -> &'static str {
        match self {
            SolveError::InvalidState(_) => "invalid_state",
            SolveError::SizeMismatch { .. } => "size_mismatch",
            SolveError::OutOfBounds(_) => "out_of_bounds",
            SolveError::Exhausted { .. } => "exhausted",
            SolveError::Timeout { .. } => "timeout",
        }
    }
}
