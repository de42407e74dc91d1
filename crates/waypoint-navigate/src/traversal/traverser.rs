use tracing::{debug, info, warn};
use waypoint_graph::StateId;
use waypoint_path::Path;

use super::trace::TraversalTrace;
use crate::collaborators::{TransitionEvaluator, TransitionExecutor, TransitionRegistry};

/// Where the traverser is in its current (or last) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalState {
    #[default]
    NotStarted,
    Advancing,
    Succeeded,
    Failed,
}

/// Walks a [`Path`] hop by hop through a [`TransitionExecutor`].
///
/// The traverser is dumb: it does not retry, re-plan or skip hops. On the
/// first hop the executor rejects it stops and remembers where that hop
/// started, so the caller can discard routes through that state and try
/// again.
pub struct PathTraverser<E, R, V>
where
    E: TransitionExecutor,
    R: TransitionRegistry,
    V: TransitionEvaluator,
{
    executor: E,
    registry: R,
    evaluator: V,
    state: TraversalState,
    failed_transition_start_state: Option<StateId>,
    trace: TraversalTrace,
}

impl<E, R, V> PathTraverser<E, R, V>
where
    E: TransitionExecutor,
    R: TransitionRegistry,
    V: TransitionEvaluator,
{
    pub fn new(executor: E, registry: R, evaluator: V) -> Self {
        Self {
            executor,
            registry,
            evaluator,
            state: TraversalState::NotStarted,
            failed_transition_start_state: None,
            trace: TraversalTrace::new(),
        }
    }

    /// Execute every hop of `path` in order. Returns true when all of them
    /// succeed; an empty or single-state path needs no hops and succeeds.
    pub fn traverse(&mut self, path: &Path) -> bool {
        self.failed_transition_start_state = None;
        self.state = TraversalState::NotStarted;
        self.trace = TraversalTrace::new();

        if path.len() < 2 {
            debug!(path = %path, "nothing to traverse");
            self.state = TraversalState::Succeeded;
            return true;
        }

        self.state = TraversalState::Advancing;
        debug!(path = %path, score = path.score(), "traversing path");

        for (from, to) in path.hops() {
            let arrived = self.executor.go(from, to);
            self.trace.record(from, to, arrived);
            if !arrived {
                warn!(%from, %to, "transition failed");
                self.failed_transition_start_state = Some(from);
                self.state = TraversalState::Failed;
                return false;
            }
            debug!(%from, %to, "transition succeeded");
        }

        info!(path = %path, hops = self.trace.len(), "path traversed");
        self.state = TraversalState::Succeeded;
        true
    }

    /// Run the arrival transition of `state`. False when the registry has no
    /// definitions for it.
    pub fn finish_transition(&mut self, state: StateId) -> bool {
        let Some(definitions) = self.registry.transitions_for(state) else {
            debug!(%state, "no transitions registered; cannot finish");
            return false;
        };
        let finished = self.evaluator.evaluate(&definitions.finish);
        if finished {
            debug!(%state, transition = %definitions.finish.id, "finish transition succeeded");
        } else {
            warn!(%state, transition = %definitions.finish.id, "finish transition failed");
        }
        finished
    }

    /// Start state of the hop that failed in the last traversal.
    pub fn failed_transition_start_state(&self) -> Option<StateId> {
        self.failed_transition_start_state
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn trace(&self) -> &TraversalTrace {
        &self.trace
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{FnEvaluator, StateTransitionsRegistry};
    use waypoint_graph::{StateTransition, StateTransitions};
    use waypoint_path::path_of;

    /// Accepts every hop except the ones listed.
    struct Refusing {
        refuse: Vec<(StateId, StateId)>,
        calls: Vec<(StateId, StateId)>,
    }

    impl Refusing {
        fn new(refuse: &[(i64, i64)]) -> Self {
            Self {
                refuse: refuse
                    .iter()
                    .map(|&(a, b)| (StateId(a), StateId(b)))
                    .collect(),
                calls: Vec::new(),
            }
        }
    }

    impl TransitionExecutor for Refusing {
        fn go(&mut self, from: StateId, to: StateId) -> bool {
            self.calls.push((from, to));
            !self.refuse.contains(&(from, to))
        }
    }

    fn accept(_: &StateTransition) -> bool {
        true
    }

    fn traverser(
        refuse: &[(i64, i64)],
    ) -> PathTraverser<Refusing, StateTransitionsRegistry, FnEvaluator<fn(&StateTransition) -> bool>>
    {
        PathTraverser::new(
            Refusing::new(refuse),
            StateTransitionsRegistry::new(),
            FnEvaluator(accept as fn(&StateTransition) -> bool),
        )
    }

    #[test]
    fn starts_not_started() {
        let traverser = traverser(&[]);
        assert_eq!(traverser.state(), TraversalState::NotStarted);
        assert_eq!(traverser.failed_transition_start_state(), None);
    }

    #[test]
    fn empty_and_single_paths_succeed_without_calls() {
        let mut traverser = traverser(&[]);
        assert!(traverser.traverse(&Path::new()));
        assert!(traverser.traverse(&path_of([7i64])));
        assert_eq!(traverser.state(), TraversalState::Succeeded);
        assert!(traverser.executor().calls.is_empty());
        assert!(traverser.trace().is_empty());
    }

    #[test]
    fn stops_at_first_refused_hop() {
        let mut traverser = traverser(&[(2, 3)]);
        assert!(!traverser.traverse(&path_of([1i64, 2, 3, 4])));

        assert_eq!(traverser.state(), TraversalState::Failed);
        assert_eq!(traverser.failed_transition_start_state(), Some(StateId(2)));
        assert_eq!(
            traverser.executor().calls.last(),
            Some(&(StateId(2), StateId(3)))
        );
        assert_eq!(traverser.executor().calls.len(), 2);
        assert_eq!(traverser.trace().failure().map(|s| s.to), Some(StateId(3)));
    }

    #[test]
    fn later_success_clears_failed_marker() {
        let mut traverser = traverser(&[(1, 2)]);
        assert!(!traverser.traverse(&path_of([1i64, 2])));
        assert_eq!(traverser.failed_transition_start_state(), Some(StateId(1)));

        assert!(traverser.traverse(&path_of([3i64, 4])));
        assert_eq!(traverser.failed_transition_start_state(), None);
        assert_eq!(traverser.trace().len(), 1);
    }

    #[test]
    fn finish_transition_needs_definitions() {
        let registry: StateTransitionsRegistry = [StateTransitions::new(StateId(5))
            .with_finish(StateTransition::new("arrive-5"))]
        .into_iter()
        .collect();
        let mut seen = Vec::new();
        let mut traverser = PathTraverser::new(
            Refusing::new(&[]),
            &registry,
            FnEvaluator(|t: &StateTransition| {
                seen.push(t.id.clone());
                true
            }),
        );

        assert!(traverser.finish_transition(StateId(5)));
        assert!(!traverser.finish_transition(StateId(6)));
        drop(traverser);
        assert_eq!(seen, vec!["arrive-5".to_string()]);
    }
}
