use tracing::{debug, trace};
use waypoint_graph::reachability::can_reach;
use waypoint_graph::{StateId, StateSet, TransitionGraphIndex};
use waypoint_path::{Path, Paths};

use crate::collaborators::StateMetadataLookup;
use crate::config::{CancellationFlag, SearchLimits, StopReason};

/// Outcome of a search, including why it ended.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub paths: Paths,
    /// Search nodes expanded, sources included.
    pub expansions: u64,
    pub stop_reason: StopReason,
}

impl SearchReport {
    fn empty() -> Self {
        Self {
            paths: Paths::new(),
            expansions: 0,
            stop_reason: StopReason::Exhausted,
        }
    }
}

/// Sum of the path scores of every state on `path`. Unknown states count 0.
pub fn score_path<L: StateMetadataLookup + ?Sized>(lookup: &L, path: &Path) -> i64 {
    path.states()
        .map(|state| i64::from(lookup.path_score(state)))
        .sum()
}

/// Enumerates simple routes from a set of active states to a target.
///
/// The search runs backward from the target over the predecessor relation
/// of the [`TransitionGraphIndex`]. A branch that would revisit one of its own
/// states is dropped, so self-loops and cycles terminate. Reaching any source
/// state completes a route; that branch is not extended further. Every route
/// found is returned, not only the best one.
pub struct PathFinder<'a, L: StateMetadataLookup> {
    index: &'a TransitionGraphIndex,
    lookup: L,
    limits: SearchLimits,
    cancellation: Option<CancellationFlag>,
}

impl<'a, L: StateMetadataLookup> PathFinder<'a, L> {
    pub fn new(index: &'a TransitionGraphIndex, lookup: L) -> Self {
        Self {
            index,
            lookup,
            limits: SearchLimits::default(),
            cancellation: None,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// All routes from any state in `from_states` to `target`.
    ///
    /// Empty when `from_states` is empty, when there is no target (or the
    /// target is the `NULL` state), or when the target is unreachable. A
    /// target that is already a source yields the single route `[target]`.
    pub fn find_paths(&self, from_states: &StateSet, target: impl Into<Option<StateId>>) -> Paths {
        self.search(from_states, target).paths
    }

    /// Like [`find_paths`](Self::find_paths), but also reports how much work
    /// was done and whether a limit cut the search short.
    pub fn search(
        &self,
        from_states: &StateSet,
        target: impl Into<Option<StateId>>,
    ) -> SearchReport {
        let target = match target.into() {
            Some(target) if !target.is_null() => target,
            _ => {
                debug!("no target state; nothing to search");
                return SearchReport::empty();
            }
        };
        if from_states.is_empty() {
            debug!(%target, "no source states; nothing to search");
            return SearchReport::empty();
        }

        debug!(
            from = ?from_states,
            target = %self.lookup.display_name(target),
            "searching for paths"
        );

        if !can_reach(self.index, from_states, target) {
            debug!(%target, "target unreachable from source states");
            return SearchReport::empty();
        }

        let mut search = Search {
            finder: self,
            from_states,
            branch: Vec::new(),
            on_branch: StateSet::new(),
            paths: Paths::new(),
            expansions: 0,
            stop: None,
        };
        search.run(target);

        let mut paths = search.paths;
        if self.limits.sort_by_score {
            paths.sort();
        }
        let stop_reason = search.stop.unwrap_or(StopReason::Exhausted);
        debug!(
            %target,
            paths = paths.len(),
            expansions = search.expansions,
            ?stop_reason,
            "path search finished"
        );

        SearchReport {
            paths,
            expansions: search.expansions,
            stop_reason,
        }
    }
}

/// Pending predecessors of one state on the current branch.
struct Frame {
    state: StateId,
    parents: std::collections::btree_set::IntoIter<StateId>,
}

/// Mutable state of one depth-first enumeration.
struct Search<'s, 'a, L: StateMetadataLookup> {
    finder: &'s PathFinder<'a, L>,
    from_states: &'s StateSet,
    /// Current branch, target first.
    branch: Vec<StateId>,
    on_branch: StateSet,
    paths: Paths,
    expansions: u64,
    stop: Option<StopReason>,
}

impl<'s, 'a, L: StateMetadataLookup> Search<'s, 'a, L> {
    /// Uses an explicit frame stack rather than recursion, so long chains
    /// cannot overflow the call stack.
    fn run(&mut self, target: StateId) {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.enter(target) {
            stack.push(frame);
        }

        while self.stop.is_none() {
            let next = match stack.last_mut() {
                Some(frame) => frame.parents.next(),
                None => break,
            };
            match next {
                Some(parent) if self.on_branch.contains(&parent) => {
                    trace!(state = %parent, "skipping state already on branch");
                }
                Some(parent) => {
                    if let Some(frame) = self.enter(parent) {
                        stack.push(frame);
                    }
                }
                None => {
                    if let Some(done) = stack.pop() {
                        self.branch.pop();
                        self.on_branch.remove(&done.state);
                    }
                }
            }
        }
    }

    /// Expand `state`. Sources complete a route and return `None`; other
    /// states join the branch and return a frame over their predecessors.
    fn enter(&mut self, state: StateId) -> Option<Frame> {
        let finder = self.finder;
        let limits = &finder.limits;
        if let Some(flag) = &finder.cancellation {
            if flag.is_cancelled() {
                self.stop = Some(StopReason::Cancelled);
                return None;
            }
        }
        if let Some(max) = limits.max_expansions {
            if self.expansions >= max {
                self.stop = Some(StopReason::ExpansionLimit);
                return None;
            }
        }
        self.expansions += 1;

        let depth = self.branch.len() + 1;
        if self.from_states.contains(&state) {
            // The target itself is always a route when it is already active.
            if depth > 1 && limits.max_depth.is_some_and(|max| depth > max) {
                return None;
            }
            self.branch.push(state);
            self.materialize();
            self.branch.pop();
            if limits.max_paths.is_some_and(|max| self.paths.len() >= max) {
                self.stop = Some(StopReason::PathLimit);
            }
            return None;
        }

        // A non-source state still needs at least one more state before it.
        if limits.max_depth.is_some_and(|max| depth >= max) {
            return None;
        }

        trace!(%state, depth, "expanding");
        self.branch.push(state);
        self.on_branch.insert(state);
        Some(Frame {
            state,
            parents: finder.index.predecessors(state).into_iter(),
        })
    }

    /// Turn the current branch into a forward route, source first.
    fn materialize(&mut self) {
        let index = self.finder.index;
        let mut path = Path::new();
        let mut previous: Option<StateId> = None;
        for &state in self.branch.iter().rev() {
            let transition = previous.and_then(|from| index.transition(from, state));
            path.push_step(state, transition);
            previous = Some(state);
        }
        let score = score_path(&self.finder.lookup, &path);
        path.set_score(score);
        debug!(path = %path, score, "found path");
        self.paths.add(path);
    }
}
