//! Traits for everything the engine consumes but does not own.
//!
//! The state repository, the action layer that actually clicks and types,
//! and the tracker of what is on screen all live in the embedding
//! application. Each is reached through one small trait here, with an
//! in-memory implementation where that is useful on its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waypoint_graph::{StateId, StateSet, StateTransition, StateTransitions};

/// What the engine needs to know about a state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateMetadata {
    #[serde(default)]
    pub name: String,
    /// Preference weight summed along a route to rank it.
    #[serde(default)]
    pub path_score: i32,
}

impl StateMetadata {
    pub fn new(name: impl Into<String>, path_score: i32) -> Self {
        Self {
            name: name.into(),
            path_score,
        }
    }
}

/// Read access to the state repository.
pub trait StateMetadataLookup {
    fn metadata(&self, state: StateId) -> Option<StateMetadata>;

    /// Score of `state`, 0 when the repository does not know it.
    fn path_score(&self, state: StateId) -> i32 {
        self.metadata(state).map_or(0, |m| m.path_score)
    }

    /// `name(id)` when the state is known, otherwise just the id.
    fn display_name(&self, state: StateId) -> String {
        match self.metadata(state) {
            Some(m) if !m.name.is_empty() => format!("{}({state})", m.name),
            _ => state.to_string(),
        }
    }
}

impl<T: StateMetadataLookup + ?Sized> StateMetadataLookup for &T {
    fn metadata(&self, state: StateId) -> Option<StateMetadata> {
        (**self).metadata(state)
    }
}

/// In-memory state repository.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    states: BTreeMap<StateId, StateMetadata>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: StateId, metadata: StateMetadata) -> Option<StateMetadata> {
        self.states.insert(state, metadata)
    }

    pub fn with_state(mut self, state: StateId, name: &str, path_score: i32) -> Self {
        self.states.insert(state, StateMetadata::new(name, path_score));
        self
    }

    pub fn remove(&mut self, state: StateId) -> Option<StateMetadata> {
        self.states.remove(&state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateMetadataLookup for StateRegistry {
    fn metadata(&self, state: StateId) -> Option<StateMetadata> {
        self.states.get(&state).cloned()
    }
}

/// Performs the real-world actions that move the application from one
/// state to another and reports whether it got there.
pub trait TransitionExecutor {
    fn go(&mut self, from: StateId, to: StateId) -> bool;
}

impl<T: TransitionExecutor + ?Sized> TransitionExecutor for &mut T {
    fn go(&mut self, from: StateId, to: StateId) -> bool {
        (**self).go(from, to)
    }
}

impl<T: TransitionExecutor + ?Sized> TransitionExecutor for Box<T> {
    fn go(&mut self, from: StateId, to: StateId) -> bool {
        (**self).go(from, to)
    }
}

/// Source of the transition definitions owned by each state.
pub trait TransitionRegistry {
    fn transitions_for(&self, state: StateId) -> Option<&StateTransitions>;
}

impl<T: TransitionRegistry + ?Sized> TransitionRegistry for &T {
    fn transitions_for(&self, state: StateId) -> Option<&StateTransitions> {
        (**self).transitions_for(state)
    }
}

/// In-memory registry keyed by owning state.
#[derive(Debug, Clone, Default)]
pub struct StateTransitionsRegistry {
    definitions: BTreeMap<StateId, StateTransitions>,
}

impl StateTransitionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any definition already held for the same state.
    pub fn insert(&mut self, definition: StateTransitions) {
        self.definitions.insert(definition.state_id, definition);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransitions> {
        self.definitions.values()
    }
}

impl FromIterator<StateTransitions> for StateTransitionsRegistry {
    fn from_iter<I: IntoIterator<Item = StateTransitions>>(iter: I) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.insert(definition);
        }
        registry
    }
}

impl TransitionRegistry for StateTransitionsRegistry {
    fn transitions_for(&self, state: StateId) -> Option<&StateTransitions> {
        self.definitions.get(&state)
    }
}

/// Runs a single transition definition and reports success.
pub trait TransitionEvaluator {
    fn evaluate(&mut self, transition: &StateTransition) -> bool;
}

impl<T: TransitionEvaluator + ?Sized> TransitionEvaluator for &mut T {
    fn evaluate(&mut self, transition: &StateTransition) -> bool {
        (**self).evaluate(transition)
    }
}

/// Adapts any `FnMut(&StateTransition) -> bool` into an evaluator.
pub struct FnEvaluator<F>(pub F);

impl<F: FnMut(&StateTransition) -> bool> TransitionEvaluator for FnEvaluator<F> {
    fn evaluate(&mut self, transition: &StateTransition) -> bool {
        (self.0)(transition)
    }
}

/// The states the application currently believes are on screen.
pub trait ActiveStates {
    fn active_states(&self) -> StateSet;
}

impl<T: ActiveStates + ?Sized> ActiveStates for &T {
    fn active_states(&self) -> StateSet {
        (**self).active_states()
    }
}

impl ActiveStates for StateSet {
    fn active_states(&self) -> StateSet {
        self.clone()
    }
}
