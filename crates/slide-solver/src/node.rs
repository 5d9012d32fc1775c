//! Search nodes and move generation.

use smallvec::SmallVec;

use crate::board::{Board, Move, MovePath};

/// A board together with its A* bookkeeping.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: Board,
    /// Moves taken from the initial board.
    pub g: u32,
    /// Estimated moves remaining.
    pub h: u32,
    pub path: MovePath,
}

impl SearchNode {
    /// The search root: no moves taken yet.
    pub fn root(state: Board, h: u32) -> Self {
        Self {
            state,
            g: 0,
            h,
            path: MovePath::new(),
        }
    }

    /// Total estimated cost, the frontier ordering key.
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.path.as_slice().last().copied()
    }
}

/// Children reachable by one blank move, in [`Move::ALL`] order.
///
/// Directions that would push the blank off the board are skipped. Children
/// come back with `h = 0`; scoring them is up to the caller.
pub fn expand(node: &SearchNode) -> SmallVec<[SearchNode; 4]> {
    let mut children = SmallVec::new();
    for mv in Move::ALL {
        if let Some(state) = node.state.neighbor(mv) {
            children.push(SearchNode {
                state,
                g: node.g + 1,
                h: 0,
                path: node.path.with(mv),
            });
        }
    }
    children
}
