use std::fmt;

use waypoint_graph::{StateId, StateSet, TransitionRef};

use crate::PathError;

/// One position on a route: the state reached and the transition used to
/// reach it. The first step of a route normally has no incoming transition.
#[derive(Debug, Clone)]
pub struct PathStep {
    pub state: StateId,
    pub transition: Option<TransitionRef>,
}

impl PathStep {
    pub fn new(state: StateId) -> Self {
        Self {
            state,
            transition: None,
        }
    }
}

/// An ordered route through the state graph with an aggregate score.
///
/// Equality only compares the state sequence: two routes over the same
/// states with different scores or transitions are equal. Do not rely on
/// `==` to deduplicate routes that differ only in how they were scored.
///
/// `clone()` is the copy operation. Steps and score are copied by value;
/// transitions are shared references in an independent list, so mutating
/// the copy never changes the original.
#[derive(Debug, Clone, Default)]
pub struct Path {
    steps: Vec<PathStep>,
    score: i64,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state without an incoming transition.
    pub fn push(&mut self, state: StateId) {
        self.steps.push(PathStep::new(state));
    }

    pub fn push_step(&mut self, state: StateId, transition: Option<TransitionRef>) {
        self.steps.push(PathStep { state, transition });
    }

    /// Attach the incoming transition of the step at `index`.
    pub fn set_transition(
        &mut self,
        index: usize,
        transition: Option<TransitionRef>,
    ) -> Result<(), PathError> {
        let len = self.steps.len();
        let step = self
            .steps
            .get_mut(index)
            .ok_or(PathError::IndexOutOfRange { index, len })?;
        step.transition = transition;
        Ok(())
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.steps.iter().any(|step| step.state == state)
    }

    pub fn get(&self, index: usize) -> Result<StateId, PathError> {
        self.steps
            .get(index)
            .map(|step| step.state)
            .ok_or(PathError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            })
    }

    /// Remove the first occurrence of `state`, shifting later steps down.
    pub fn remove(&mut self, state: StateId) -> bool {
        match self.steps.iter().position(|step| step.state == state) {
            Some(position) => {
                self.steps.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<StateId> {
        self.steps.first().map(|step| step.state)
    }

    pub fn last(&self) -> Option<StateId> {
        self.steps.last().map(|step| step.state)
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.steps.iter().map(|step| step.state)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Incoming transition of the step at `index`.
    pub fn transition_at(&self, index: usize) -> Option<&TransitionRef> {
        self.steps.get(index).and_then(|step| step.transition.as_ref())
    }

    /// Consecutive `(from, to)` pairs along the route.
    pub fn hops(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.steps
            .windows(2)
            .map(|pair| (pair[0].state, pair[1].state))
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    /// Reverse the route in place. Incoming transitions move with their
    /// states and are not re-anchored to the new order.
    pub fn reverse(&mut self) {
        self.steps.reverse();
    }

    /// The suffix starting at the first step whose state is active, or an
    /// empty path when no state on the route is active. The score is carried
    /// over unchanged.
    pub fn trim(&self, active: &StateSet) -> Path {
        match self
            .steps
            .iter()
            .position(|step| active.contains(&step.state))
        {
            Some(start) => Path {
                steps: self.steps[start..].to_vec(),
                score: self.score,
            },
            None => Path::new(),
        }
    }

    /// Empty when the route passes through `failed`, otherwise
    /// [`trim`](Self::trim) against `active`.
    pub fn clean(&self, active: &StateSet, failed: Option<StateId>) -> Path {
        match failed {
            Some(failed) if self.contains(failed) => Path::new(),
            _ => self.trim(active),
        }
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(a, b)| a.state == b.state)
    }
}

impl Eq for Path {}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states = self.states();
        if let Some(first) = states.next() {
            write!(f, "{first}")?;
            for state in states {
                write!(f, " -> {state}")?;
            }
        }
        Ok(())
    }
}

impl FromIterator<StateId> for Path {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        Path {
            steps: iter.into_iter().map(PathStep::new).collect(),
            score: 0,
        }
    }
}

impl Extend<StateId> for Path {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        self.steps.extend(iter.into_iter().map(PathStep::new));
    }
}

/// Build a path from raw ids.
pub fn path_of<I>(ids: I) -> Path
where
    I: IntoIterator,
    I::Item: Into<StateId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use waypoint_graph::{state_set, StateTransition};

    #[test]
    fn push_and_query() {
        let mut path = Path::new();
        assert!(path.is_empty());
        path.push(StateId(1));
        path.push(StateId(2));

        assert_eq!(path.len(), 2);
        assert!(path.contains(StateId(2)));
        assert!(!path.contains(StateId(3)));
        assert_eq!(path.get(1).unwrap(), StateId(2));
        assert_eq!(path.first(), Some(StateId(1)));
        assert_eq!(path.last(), Some(StateId(2)));
    }

    #[test]
    fn get_out_of_range_is_an_error() {
        let path = path_of([1i64, 2]);
        let err = path.get(2).unwrap_err();
        assert_eq!(err, PathError::IndexOutOfRange { index: 2, len: 2 });
        assert!(Path::new().get(0).is_err());
    }

    #[test]
    fn remove_first_occurrence_only() {
        let mut path = path_of([1i64, 2, 3, 2]);
        assert!(path.remove(StateId(2)));
        assert_eq!(path, path_of([1i64, 3, 2]));
        assert!(!path.remove(StateId(9)));
    }

    #[test]
    fn reverse_twice_restores_order() {
        let mut path = path_of([1i64, 2, 3]);
        path.reverse();
        assert_eq!(path, path_of([3i64, 2, 1]));
        path.reverse();
        assert_eq!(path, path_of([1i64, 2, 3]));
    }

    #[test]
    fn clone_is_independent() {
        let mut original = path_of([1i64, 2]);
        original.set_score(7);
        let transition = Arc::new(StateTransition::new("t"));
        original
            .set_transition(1, Some(Arc::clone(&transition)))
            .unwrap();

        let mut copy = original.clone();
        copy.push(StateId(3));
        copy.set_score(1);
        copy.set_transition(1, None).unwrap();

        assert_eq!(original, path_of([1i64, 2]));
        assert_eq!(original.score(), 7);
        assert!(Arc::ptr_eq(original.transition_at(1).unwrap(), &transition));
    }

    #[test]
    fn trim_starts_at_first_active_state() {
        let path = path_of([100i64, 200, 300, 400, 500]);
        let trimmed = path.trim(&state_set([300i64, 500]));
        assert_eq!(trimmed, path_of([300i64, 400, 500]));
        assert!(path.trim(&state_set([999i64])).is_empty());
    }

    #[test]
    fn trim_keeps_matching_transitions_and_score() {
        let mut path = path_of([1i64, 2, 3]);
        path.set_score(12);
        path.set_transition(2, Some(Arc::new(StateTransition::new("two-three"))))
            .unwrap();

        let trimmed = path.trim(&state_set([2i64]));
        assert_eq!(trimmed.score(), 12);
        assert!(trimmed.transition_at(0).is_none());
        assert_eq!(trimmed.transition_at(1).unwrap().id, "two-three");
    }

    #[test]
    fn clean_drops_route_through_failed_state() {
        let path = path_of([100i64, 200, 300, 400, 500]);
        assert!(path
            .clean(&state_set([300i64]), Some(StateId(200)))
            .is_empty());
        assert_eq!(
            path.clean(&state_set([300i64]), Some(StateId(999))),
            path_of([300i64, 400, 500])
        );
        assert_eq!(
            path.clean(&state_set([300i64]), None),
            path_of([300i64, 400, 500])
        );
    }

    #[test]
    fn display_joins_with_arrows() {
        assert_eq!(path_of([1i64, 2, 3]).to_string(), "1 -> 2 -> 3");
        assert_eq!(Path::new().to_string(), "");
        assert_eq!(path_of([4i64]).to_string(), "4");
    }

    #[test]
    fn equality_ignores_score_and_transitions() {
        let mut a = path_of([1i64, 2]);
        let b = path_of([1i64, 2]);
        a.set_score(100);
        a.set_transition(1, Some(Arc::new(StateTransition::new("x"))))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, path_of([2i64, 1]));
        assert_ne!(a, path_of([1i64]));
        assert_eq!(Path::new(), Path::new());
    }

    #[test]
    fn hops_pair_consecutive_states() {
        let hops: Vec<_> = path_of([1i64, 2, 3]).hops().collect();
        assert_eq!(
            hops,
            vec![(StateId(1), StateId(2)), (StateId(2), StateId(3))]
        );
        assert_eq!(path_of([1i64]).hops().count(), 0);
    }
}
