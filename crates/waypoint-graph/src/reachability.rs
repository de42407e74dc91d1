//! Static reachability over the transition graph.
//!
//! Answers "can any of these states ever lead to that one?" without
//! enumerating routes. The path finder uses it to reject unreachable targets
//! before starting its depth-first enumeration.

use std::collections::VecDeque;

use crate::index::TransitionGraphIndex;
use crate::state::{StateId, StateSet};

/// Every state with some route into `target`, found by a breadth-first walk
/// over predecessors. `target` itself is included only when it lies on a
/// cycle.
pub fn ancestors(index: &TransitionGraphIndex, target: StateId) -> StateSet {
    let mut visited = StateSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(target);

    while let Some(current) = queue.pop_front() {
        for parent in index.predecessors(current) {
            if visited.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    visited
}

/// Whether some state in `from` has a route into `target`. A target that is
/// already in `from` counts as reachable.
pub fn can_reach(index: &TransitionGraphIndex, from: &StateSet, target: StateId) -> bool {
    if from.contains(&target) {
        return true;
    }
    let reaching = ancestors(index, target);
    from.iter().any(|state| reaching.contains(state))
}
