//! Cost-ordered frontier and the visited-key set.
//!
//! The frontier does no deduplication. The solver checks [`VisitedSet`]
//! before pushing, so a duplicate board never takes up frontier memory.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use crate::board::StateKey;
use crate::error::EmptyFrontierError;
use crate::node::SearchNode;

/// A node with its `(f, insertion sequence)` ordering key.
///
/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse` to pop the
/// lowest `f` first, oldest first among equal `f`.
#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<(u32, u64)>,
    node: SearchNode,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-`f` priority queue with FIFO tie-breaking.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) {
        let key = Reverse((node.f(), self.next_seq));
        self.next_seq += 1;
        self.heap.push(FrontierEntry { key, node });
        self.high_water = self.high_water.max(self.heap.len());
    }

    /// Remove the node with the lowest `f`; the earliest pushed wins ties.
    pub fn pop_min(&mut self) -> Result<SearchNode, EmptyFrontierError> {
        self.heap
            .pop()
            .map(|entry| entry.node)
            .ok_or(EmptyFrontierError)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest size the frontier has reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Keys of every board already accepted into the frontier.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: HashSet<StateKey>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.keys.contains(key)
    }

    /// Record `key`. Returns `false` if it was already present.
    pub fn insert(&mut self, key: StateKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
