//! Remaining-cost estimates for the A* search.
//!
//! Each heuristic is an independent pure function over a board and a
//! precomputed [`GoalIndex`]. The solver picks one through [`HeuristicKind`].
//!
//! [`HeuristicKind::Manhattan`] is the default and is evaluated once per node,
//! which keeps it admissible and consistent, so A* returns a shortest path.
//! [`HeuristicKind::DoubledManhattan`] counts the Manhattan distance twice. It
//! can overestimate, so it trades optimality for fewer expansions and is only
//! used when asked for explicitly.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::SolveError;

/// Goal coordinates of every value, built once per search.
///
/// Every heuristic below expects the scored board to have the same size as
/// the goal this index was built from.
#[derive(Debug, Clone)]
pub struct GoalIndex {
    size: usize,
    positions: Vec<(usize, usize)>,
}

impl GoalIndex {
    pub fn new(goal: &Board) -> Self {
        let size = goal.size();
        let mut positions = vec![(0, 0); goal.cells().len()];
        for (i, &value) in goal.cells().iter().enumerate() {
            positions[value as usize] = (i / size, i % size);
        }
        Self { size, positions }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// (row, col) of `value` on the goal board.
    pub fn position(&self, value: u32) -> (usize, usize) {
        self.positions[value as usize]
    }
}

/// Heuristic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Sum of tile Manhattan distances.
    #[default]
    Manhattan,
    /// Twice the Manhattan distance. Not admissible.
    DoubledManhattan,
    /// Number of tiles off their goal cell.
    MisplacedTiles,
    /// Manhattan distance plus linear-conflict penalties.
    LinearConflict,
}

impl HeuristicKind {
    pub fn estimate(self, state: &Board, goal: &GoalIndex) -> u32 {
        debug_assert_eq!(state.size(), goal.size(), "board and goal sizes differ");
        match self {
            HeuristicKind::Manhattan => manhattan(state, goal),
            HeuristicKind::DoubledManhattan => doubled_manhattan(state, goal),
            HeuristicKind::MisplacedTiles => misplaced_tiles(state, goal),
            HeuristicKind::LinearConflict => linear_conflict(state, goal),
        }
    }

    /// Whether the estimate never exceeds the true distance.
    pub fn is_admissible(self) -> bool {
        !matches!(self, HeuristicKind::DoubledManhattan)
    }
}

/// Manhattan distance of `state` from `goal`, building the index on the spot.
pub fn estimate(state: &Board, goal: &Board) -> Result<u32, SolveError> {
    let index = GoalIndex::new(goal);
    if state.size() != index.size() {
        return Err(SolveError::SizeMismatch {
            initial: state.size(),
            goal: index.size(),
        });
    }
    Ok(manhattan(state, &index))
}

pub fn manhattan(state: &Board, goal: &GoalIndex) -> u32 {
    let size = state.size();
    let mut distance = 0;
    for (i, &value) in state.cells().iter().enumerate() {
        if value == 0 {
            continue;
        }
        let (goal_row, goal_col) = goal.position(value);
        distance += (i / size).abs_diff(goal_row) + (i % size).abs_diff(goal_col);
    }
    distance as u32
}

pub fn doubled_manhattan(state: &Board, goal: &GoalIndex) -> u32 {
    2 * manhattan(state, goal)
}

pub fn misplaced_tiles(state: &Board, goal: &GoalIndex) -> u32 {
    let size = state.size();
    state
        .cells()
        .iter()
        .enumerate()
        .filter(|&(i, &value)| value != 0 && goal.position(value) != (i / size, i % size))
        .count() as u32
}

/// Manhattan distance plus two moves for every tile that has to leave its
/// row or column so the tiles already in their goal line can pass each other.
///
/// Per line, the tiles that may stay form the longest run whose goal
/// positions are increasing; every other goal-line tile is in conflict.
pub fn linear_conflict(state: &Board, goal: &GoalIndex) -> u32 {
    let size = state.size();
    let mut conflicts = 0;
    let mut line = Vec::with_capacity(size);

    for row in 0..size {
        line.clear();
        for col in 0..size {
            let value = state.get(row, col);
            if value == 0 {
                continue;
            }
            let (goal_row, goal_col) = goal.position(value);
            if goal_row == row {
                line.push(goal_col);
            }
        }
        conflicts += line.len() - longest_increasing_run(&line);
    }

    for col in 0..size {
        line.clear();
        for row in 0..size {
            let value = state.get(row, col);
            if value == 0 {
                continue;
            }
            let (goal_row, goal_col) = goal.position(value);
            if goal_col == col {
                line.push(goal_row);
            }
        }
        conflicts += line.len() - longest_increasing_run(&line);
    }

    manhattan(state, goal) + 2 * conflicts as u32
}

fn longest_increasing_run(seq: &[usize]) -> usize {
    let mut tails: Vec<usize> = Vec::with_capacity(seq.len());
    for &x in seq {
        let i = tails.partition_point(|&t| t < x);
        if i == tails.len() {
            tails.push(x);
        } else {
            tails[i] = x;
        }
    }
    tails.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u32]]) -> Board {
        Board::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn goal3() -> GoalIndex {
        GoalIndex::new(&Board::solved(3).unwrap())
    }

    #[test]
    fn test_goal_index_positions() {
        let index = goal3();
        assert_eq!(index.size(), 3);
        assert_eq!(index.position(1), (0, 0));
        assert_eq!(index.position(6), (1, 2));
        assert_eq!(index.position(0), (2, 2));
    }

    #[test]
    fn test_zero_at_goal() {
        let goal = Board::solved(3).unwrap();
        let index = goal3();
        for kind in [
            HeuristicKind::Manhattan,
            HeuristicKind::DoubledManhattan,
            HeuristicKind::MisplacedTiles,
            HeuristicKind::LinearConflict,
        ] {
            assert_eq!(kind.estimate(&goal, &index), 0, "{kind:?}");
        }
    }

    #[test]
    fn test_manhattan_known_board() {
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        assert_eq!(manhattan(&b, &goal3()), 10);
        assert_eq!(estimate(&b, &Board::solved(3).unwrap()), Ok(10));
        assert_eq!(doubled_manhattan(&b, &goal3()), 20);
    }

    #[test]
    fn test_estimate_rejects_size_mismatch() {
        let three = Board::solved(3).unwrap();
        assert_eq!(
            estimate(&Board::solved(4).unwrap(), &three),
            Err(SolveError::SizeMismatch { initial: 4, goal: 3 })
        );
        assert_eq!(
            estimate(&Board::solved(2).unwrap(), &three),
            Err(SolveError::SizeMismatch { initial: 2, goal: 3 })
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "sizes differ")]
    fn test_kind_estimate_asserts_matching_size() {
        HeuristicKind::Manhattan.estimate(&Board::solved(2).unwrap(), &goal3());
    }

    #[test]
    fn test_manhattan_ignores_blank() {
        let b = board(&[&[1, 2, 3], &[4, 5, 0], &[7, 8, 6]]);
        assert_eq!(manhattan(&b, &goal3()), 1);
    }

    #[test]
    fn test_misplaced_tiles() {
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        assert_eq!(misplaced_tiles(&b, &goal3()), 5);
    }

    #[test]
    fn test_linear_conflict_adds_penalty() {
        let b = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(manhattan(&b, &goal3()), 2);
        assert_eq!(linear_conflict(&b, &goal3()), 4);

        // no conflicts: same as manhattan
        let c = board(&[&[1, 2, 3], &[4, 5, 0], &[7, 8, 6]]);
        assert_eq!(linear_conflict(&c, &goal3()), manhattan(&c, &goal3()));
    }

    #[test]
    fn test_longest_increasing_run() {
        assert_eq!(longest_increasing_run(&[]), 0);
        assert_eq!(longest_increasing_run(&[2, 1, 0]), 1);
        assert_eq!(longest_increasing_run(&[1, 0, 2]), 2);
        assert_eq!(longest_increasing_run(&[0, 1, 2, 3]), 4);
    }

    #[test]
    fn test_admissibility_flags() {
        assert!(HeuristicKind::Manhattan.is_admissible());
        assert!(HeuristicKind::LinearConflict.is_admissible());
        assert!(!HeuristicKind::DoubledManhattan.is_admissible());
        assert_eq!(HeuristicKind::default(), HeuristicKind::Manhattan);
    }
}
