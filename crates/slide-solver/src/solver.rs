//! A* control loop.
//!
//! The solver seeds the frontier with the initial board, then repeatedly pops
//! the lowest-`f` node, goal-tests it and expands it. Children already in the
//! visited set are dropped before they reach the frontier. The loop ends when
//! the goal is popped, the frontier runs dry, or a budget runs out.

use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{is_reachable, Board, MovePath};
use crate::error::SolveError;
use crate::frontier::{Frontier, VisitedSet};
use crate::heuristic::{GoalIndex, HeuristicKind};
use crate::node::{expand, SearchNode};

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Remaining-cost estimate
    pub heuristic: HeuristicKind,
    /// Stop with [`SolveError::Timeout`] after this many expansions
    pub max_expansions: Option<usize>,
    /// Stop with [`SolveError::Timeout`] once this much time has passed
    pub timeout: Option<Duration>,
    /// Report an unreachable goal as [`SolveError::Exhausted`] before searching
    pub parity_check: bool,
}

/// Where a [`Solver`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverPhase {
    Ready,
    Running,
    Solved,
    Exhausted,
    TimedOut,
}

/// Counters from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Nodes popped and expanded (the goal node is not counted)
    pub expanded: usize,
    /// Children accepted into the frontier, root included
    pub generated: usize,
    /// Peak frontier size
    pub max_frontier: usize,
    pub elapsed_ms: u64,
}

/// A successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: MovePath,
    pub stats: SearchStats,
}

/// One search from an initial board to a goal board.
///
/// Frontier and visited set live only for the duration of [`Solver::run`], so
/// separate solvers never share search state.
#[derive(Debug)]
pub struct Solver {
    initial: Board,
    goal: Board,
    config: SolverConfig,
    phase: SolverPhase,
}

impl Solver {
    pub fn new(initial: Board, goal: Board) -> Result<Self, SolveError> {
        Self::with_config(initial, goal, SolverConfig::default())
    }

    pub fn with_config(
        initial: Board,
        goal: Board,
        config: SolverConfig,
    ) -> Result<Self, SolveError> {
        if initial.size() != goal.size() {
            return Err(SolveError::SizeMismatch {
                initial: initial.size(),
                goal: goal.size(),
            });
        }
        Ok(Self {
            initial,
            goal,
            config,
            phase: SolverPhase::Ready,
        })
    }

    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn run(&mut self) -> Result<Solution, SolveError> {
        self.run_with(|_| {})
    }

    /// Run the search, handing every popped node to `on_pop` before it is
    /// goal-tested.
    pub fn run_with<F>(&mut self, mut on_pop: F) -> Result<Solution, SolveError>
    where
        F: FnMut(&SearchNode),
    {
        let start_time = Instant::now();
        let deadline = self.config.timeout.map(|t| start_time + t);
        self.phase = SolverPhase::Running;

        debug!(
            "solving {}x{} board with {:?}",
            self.initial.size(),
            self.initial.size(),
            self.config.heuristic
        );

        let mut stats = SearchStats::default();

        if self.config.parity_check && !is_reachable(&self.initial, &self.goal) {
            debug!("goal fails the parity check, not searching");
            self.phase = SolverPhase::Exhausted;
            return Err(SolveError::Exhausted { expanded: 0 });
        }

        let goal_index = GoalIndex::new(&self.goal);
        let heuristic = self.config.heuristic;

        let mut frontier = Frontier::new();
        let mut visited = VisitedSet::new();

        let h = heuristic.estimate(&self.initial, &goal_index);
        visited.insert(self.initial.key().clone());
        frontier.push(SearchNode::root(self.initial.clone(), h));
        stats.generated = 1;

        while let Ok(node) = frontier.pop_min() {
            on_pop(&node);

            if node.state.is_goal(&self.goal) {
                stats.max_frontier = frontier.high_water();
                stats.elapsed_ms = start_time.elapsed().as_millis() as u64;
                debug!(
                    "solved in {} moves after {} expansions",
                    node.path.len(),
                    stats.expanded
                );
                self.phase = SolverPhase::Solved;
                return Ok(Solution {
                    path: node.path,
                    stats,
                });
            }

            if self
                .config
                .max_expansions
                .is_some_and(|max| stats.expanded >= max)
                || deadline.is_some_and(|d| Instant::now() >= d)
            {
                debug!("budget exceeded after {} expansions", stats.expanded);
                self.phase = SolverPhase::TimedOut;
                return Err(SolveError::Timeout {
                    expanded: stats.expanded,
                });
            }

            stats.expanded += 1;
            trace!("expanding g={} h={} {}", node.g, node.h, node.state.key());

            for mut child in expand(&node) {
                if visited.contains(child.state.key()) {
                    continue;
                }
                child.h = heuristic.estimate(&child.state, &goal_index);
                visited.insert(child.state.key().clone());
                frontier.push(child);
                stats.generated += 1;
            }
        }

        debug!(
            "frontier exhausted after {} expansions, {} states seen",
            stats.expanded,
            visited.len()
        );
        self.phase = SolverPhase::Exhausted;
        Err(SolveError::Exhausted {
            expanded: stats.expanded,
        })
    }
}
