//! Board representation: tiles, blank position, moves and the canonical key.
//!
//! A [`Board`] is immutable once built. Moving the blank produces a fresh
//! board with its own cell storage, so any number of boards derived from a
//! common ancestor can sit in the frontier at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{InvalidStateError, OutOfBoundsError, ParseMoveError};

/// Direction the blank travels. `U`, `D`, `L`, `R` in a [`MovePath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Move {
    /// Expansion order. Fixed so equal-`f` tie-breaking is reproducible.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// (row delta, column delta) of the blank.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The direction the displaced tile slides when the blank moves `self`.
    pub fn tile_displacement(self) -> Move {
        self.opposite()
    }

    pub fn symbol(self) -> char {
        match self {
            Move::Up => 'U',
            Move::Down => 'D',
            Move::Left => 'L',
            Move::Right => 'R',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Move> {
        match symbol {
            'U' => Some(Move::Up),
            'D' => Some(Move::Down),
            'L' => Some(Move::Left),
            'R' => Some(Move::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Ordered blank moves from an initial board towards a goal.
///
/// Displays and serializes as the concatenated symbols, e.g. `"DLRU"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MovePath(SmallVec<[Move; 32]>);

impl MovePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }

    /// Copy of this path extended by one move.
    pub fn with(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.push(mv);
        next
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a MovePath {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Move> for MovePath {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for MovePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mv in &self.0 {
            write!(f, "{}", mv.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for MovePath {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .map(|c| Move::from_symbol(c).ok_or(ParseMoveError(c)))
            .collect()
    }
}

impl From<MovePath> for String {
    fn from(path: MovePath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for MovePath {
    type Error = ParseMoveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Canonical encoding of a grid: a width byte, then every cell big-endian in
/// row-major order using that many bytes.
///
/// The width depends only on the cell count, so keys of one board size have a
/// fixed length and two distinct grids of that size never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    pub fn encode(cells: &[u32]) -> Self {
        let max = cells.len().saturating_sub(1);
        let width: usize = if max <= u8::MAX as usize {
            1
        } else if max <= u16::MAX as usize {
            2
        } else {
            4
        };

        let mut bytes = Vec::with_capacity(1 + cells.len() * width);
        bytes.push(width as u8);
        for &value in cells {
            bytes.extend_from_slice(&value.to_be_bytes()[4 - width..]);
        }
        Self(bytes.into_boxed_slice())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode the cell values back out of the key.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        let (width, body) = self.0.split_first().unwrap_or((&1, &[][..]));
        body.chunks(usize::from(*width)).map(|chunk| {
            chunk
                .iter()
                .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
        })
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Canonical key of a row-major cell list.
pub fn canonical_key(cells: &[u32]) -> StateKey {
    StateKey::encode(cells)
}

/// One N×N configuration. Equality and hashing go through the canonical key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
    blank_row: usize,
    blank_col: usize,
    key: StateKey,
}

impl Board {
    /// Build from rows, e.g. `[[1, 2], [3, 0]]`.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, InvalidStateError> {
        let size = rows.len();
        if size == 0 {
            return Err(InvalidStateError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(InvalidStateError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
        }
        Self::build(size, rows.into_iter().flatten().collect())
    }

    /// Build from a flat row-major cell list; the side length is inferred.
    pub fn from_cells(cells: Vec<u32>) -> Result<Self, InvalidStateError> {
        if cells.is_empty() {
            return Err(InvalidStateError::Empty);
        }
        let count = cells.len();
        let size = (count as f64).sqrt().round() as usize;
        if size * size != count {
            return Err(InvalidStateError::NotAPerfectSquare { count });
        }
        Self::build(size, cells)
    }

    /// The standard goal: `1..N²` row-major with the blank in the last cell.
    pub fn solved(size: usize) -> Result<Self, InvalidStateError> {
        if size == 0 {
            return Err(InvalidStateError::Empty);
        }
        let count = (size * size) as u32;
        let cells = (1..count).chain(std::iter::once(0)).collect();
        Self::build(size, cells)
    }

    fn build(size: usize, cells: Vec<u32>) -> Result<Self, InvalidStateError> {
        let blank = cells
            .iter()
            .position(|&v| v == 0)
            .ok_or(InvalidStateError::MissingBlank)?;

        let max = (cells.len() - 1) as u32;
        let mut seen = vec![false; cells.len()];
        for &value in &cells {
            if value > max {
                return Err(InvalidStateError::ValueOutOfRange { value, max });
            }
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(InvalidStateError::Duplicate { value });
            }
        }

        let key = canonical_key(&cells);
        Ok(Self {
            size,
            cells,
            blank_row: blank / size,
            blank_col: blank % size,
            key,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, u32> {
        self.cells.chunks(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    /// (row, col) of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank_row, self.blank_col)
    }

    pub fn key(&self) -> &StateKey {
        &self.key
    }

    pub fn is_goal(&self, goal: &Board) -> bool {
        self == goal
    }

    /// Board after moving the blank one step, or `None` if it would leave the grid.
    pub fn neighbor(&self, mv: Move) -> Option<Board> {
        let (dr, dc) = mv.delta();
        let row = self.blank_row.checked_add_signed(dr)?;
        let col = self.blank_col.checked_add_signed(dc)?;
        if row >= self.size || col >= self.size {
            return None;
        }

        let mut cells = self.cells.clone();
        cells.swap(
            self.blank_row * self.size + self.blank_col,
            row * self.size + col,
        );
        let key = canonical_key(&cells);
        Some(Board {
            size: self.size,
            cells,
            blank_row: row,
            blank_col: col,
            key,
        })
    }

    /// Like [`Board::neighbor`], but reports an illegal move as an error.
    pub fn apply_move(&self, mv: Move) -> Result<Board, OutOfBoundsError> {
        self.neighbor(mv).ok_or(OutOfBoundsError {
            direction: mv,
            row: self.blank_row,
            col: self.blank_col,
            size: self.size,
        })
    }

    /// Comma-joined row-major values, e.g. `"1,2,3,4,5,6,7,8,0"`.
    pub fn to_flat_string(&self) -> String {
        self.key.to_string()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Board {}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl TryFrom<Vec<Vec<u32>>> for Board {
    type Error = InvalidStateError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<u32>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

/// Parses the comma-joined flat form. A single trailing comma is accepted.
impl FromStr for Board {
    type Err = InvalidStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix(',').unwrap_or(s);
        if s.is_empty() {
            return Err(InvalidStateError::Empty);
        }
        let cells = s
            .split(',')
            .map(|token| {
                let token = token.trim();
                token.parse::<u32>().map_err(|_| InvalidStateError::Parse {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_cells(cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in self.rows() {
            for (i, &value) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", value, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Whether `goal` can be reached from `initial` by sliding the blank.
///
/// Every move is one transposition and shifts the blank by one cell, so the
/// parity of the permutation between the two boards must match the parity of
/// the blank's Manhattan displacement.
pub fn is_reachable(initial: &Board, goal: &Board) -> bool {
    if initial.size() != goal.size() {
        return false;
    }

    let count = initial.cells().len();
    let mut goal_index = vec![0usize; count];
    for (i, &value) in goal.cells().iter().enumerate() {
        goal_index[value as usize] = i;
    }
    let permutation: Vec<usize> = initial
        .cells()
        .iter()
        .map(|&value| goal_index[value as usize])
        .collect();

    let mut visited = vec![false; count];
    let mut cycles = 0;
    for start in 0..count {
        if visited[start] {
            continue;
        }
        cycles += 1;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = permutation[i];
        }
    }
    let permutation_parity = (count - cycles) % 2;

    let (ir, ic) = initial.blank();
    let (gr, gc) = goal.blank();
    let blank_distance = ir.abs_diff(gr) + ic.abs_diff(gc);

    permutation_parity == blank_distance % 2
}
