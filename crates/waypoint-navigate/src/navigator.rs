//! Open a target state from wherever the application currently is.
//!
//! The navigator ties the other pieces together: it finds every route from
//! the active states to the target, walks the preferred one, and when a hop
//! fails it re-reads the active states, drops every route through the state
//! the failed hop started from, re-scores what is left and tries again.

use tracing::{debug, info, warn};
use waypoint_graph::{StateId, TransitionGraphIndex};
use waypoint_path::{Path, Paths};

use crate::collaborators::{
    ActiveStates, StateMetadataLookup, TransitionEvaluator, TransitionExecutor, TransitionRegistry,
};
use crate::config::{CancellationFlag, NavigatorConfig, PathSelection};
use crate::finder::{score_path, PathFinder};
use crate::traversal::traverser::PathTraverser;

/// How a call to [`StateNavigator::open_state`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The metadata lookup does not know the target.
    UnknownTarget,
    /// The target was already active; `finished` is the result of its
    /// finish transition.
    AlreadyActive { finished: bool },
    /// No route leads from the active states to the target.
    NoPath,
    /// A route was walked to the end.
    Reached { attempts: u32 },
    /// Every candidate route failed, or the attempt budget ran out.
    Exhausted {
        attempts: u32,
        failed_at: Option<StateId>,
    },
}

impl NavigationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::Reached { .. } | NavigationOutcome::AlreadyActive { finished: true }
        )
    }
}

/// Pick the route to try next.
pub fn select_path(paths: &Paths, selection: PathSelection) -> Option<&Path> {
    match selection {
        PathSelection::LowestScore => paths.lowest_scoring(),
        PathSelection::HighestScore => paths.highest_scoring(),
        PathSelection::Shortest => paths.shortest(),
    }
}

pub struct StateNavigator<'a, L, A, E, R, V>
where
    L: StateMetadataLookup,
    A: ActiveStates,
    E: TransitionExecutor,
    R: TransitionRegistry,
    V: TransitionEvaluator,
{
    index: &'a TransitionGraphIndex,
    lookup: L,
    active: A,
    traverser: PathTraverser<E, R, V>,
    config: NavigatorConfig,
    cancellation: Option<CancellationFlag>,
}

impl<'a, L, A, E, R, V> StateNavigator<'a, L, A, E, R, V>
where
    L: StateMetadataLookup,
    A: ActiveStates,
    E: TransitionExecutor,
    R: TransitionRegistry,
    V: TransitionEvaluator,
{
    pub fn new(
        index: &'a TransitionGraphIndex,
        lookup: L,
        active: A,
        traverser: PathTraverser<E, R, V>,
    ) -> Self {
        Self {
            index,
            lookup,
            active,
            traverser,
            config: NavigatorConfig::default(),
            cancellation: None,
        }
    }

    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared with every search this navigator starts.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn traverser(&self) -> &PathTraverser<E, R, V> {
        &self.traverser
    }

    pub fn traverser_mut(&mut self) -> &mut PathTraverser<E, R, V> {
        &mut self.traverser
    }

    /// Every route from the current active states to `target`.
    pub fn find_paths(&self, target: StateId) -> Paths {
        let active = self.active.active_states();
        self.finder().find_paths(&active, target)
    }

    pub fn open_state(&mut self, target: StateId) -> NavigationOutcome {
        let name = self.lookup.display_name(target);
        if self.lookup.metadata(target).is_none() {
            warn!(target = %name, "cannot open unknown state");
            return NavigationOutcome::UnknownTarget;
        }

        let active = self.active.active_states();
        debug!(target = %name, ?active, "opening state");
        if active.contains(&target) {
            let finished = self.traverser.finish_transition(target);
            info!(target = %name, finished, "target already active");
            return NavigationOutcome::AlreadyActive { finished };
        }

        let mut paths = self.finder().find_paths(&active, target);
        if paths.is_empty() {
            info!(target = %name, "no path to target");
            return NavigationOutcome::NoPath;
        }

        let mut attempts = 0u32;
        let mut failed_at = None;
        while attempts < self.config.max_attempts {
            let Some(path) = select_path(&paths, self.config.selection).cloned() else {
                break;
            };
            attempts += 1;
            debug!(target = %name, attempt = attempts, path = %path, "trying path");

            if self.traverser.traverse(&path) {
                info!(target = %name, attempts, "target reached");
                return NavigationOutcome::Reached { attempts };
            }

            failed_at = self.traverser.failed_transition_start_state();
            let active = self.active.active_states();
            paths = self.rescore(paths.clean(&active, failed_at));
            debug!(
                target = %name,
                failed_at = ?failed_at,
                remaining = paths.len(),
                "path failed; retrying with cleaned paths"
            );
        }

        warn!(target = %name, attempts, failed_at = ?failed_at, "navigation exhausted");
        NavigationOutcome::Exhausted { attempts, failed_at }
    }

    fn finder(&self) -> PathFinder<'a, &L> {
        let finder =
            PathFinder::new(self.index, &self.lookup).with_limits(self.config.search.clone());
        match &self.cancellation {
            Some(flag) => finder.with_cancellation(flag.clone()),
            None => finder,
        }
    }

    /// Trimmed routes lose the states before the active one, so their old
    /// score no longer applies.
    fn rescore(&self, paths: Paths) -> Paths {
        let mut rescored: Paths = paths
            .into_iter()
            .map(|mut path| {
                let score = score_path(&self.lookup, &path);
                path.set_score(score);
                path
            })
            .collect();
        if self.config.search.sort_by_score {
            rescored.sort();
        }
        rescored
    }
}
