use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::state::{StateId, StateSet};
use crate::transition::{StateTransitions, TransitionRef};
use crate::GraphError;

/// Reverse-adjacency index over the transition graph.
///
/// Maps each state to the states that have a transition into it, which lets
/// the path finder search backward from a target instead of forward from
/// every possible source. Population is append-only; call [`clear`] and
/// re-register to rebuild.
///
/// Besides the static tables, the index tracks which states are currently
/// hidden behind another state. A covering state counts as a predecessor of
/// the states it hides, because closing it returns to them through its
/// `PREVIOUS` transition.
///
/// [`clear`]: TransitionGraphIndex::clear
#[derive(Debug, Clone, Default)]
pub struct TransitionGraphIndex {
    incoming: BTreeMap<StateId, StateSet>,
    outgoing: BTreeMap<StateId, StateSet>,
    incoming_to_hidden: BTreeMap<StateId, StateSet>,
    edges: BTreeMap<(StateId, StateId), TransitionRef>,
}

impl TransitionGraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a complete set of definitions.
    pub fn from_definitions<'d, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = &'d StateTransitions>,
    {
        let mut index = Self::new();
        for definition in definitions {
            index.add_state_transitions(definition);
        }
        index
    }

    /// Parse a JSON array of [`StateTransitions`] and index it.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let definitions: Vec<StateTransitions> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(&definitions))
    }

    /// Drop every registered transition.
    pub fn clear(&mut self) {
        self.incoming.clear();
        self.outgoing.clear();
        self.incoming_to_hidden.clear();
        self.edges.clear();
    }

    /// Register every state activated by the transitions of one state.
    ///
    /// Any state may own transitions, special states included: `UNKNOWN`
    /// owns the way out when the application is lost. The first transition
    /// registered for a `(from, to)` pair is the one reported by
    /// [`transition`](Self::transition).
    pub fn add_state_transitions(&mut self, definition: &StateTransitions) {
        let from = definition.state_id;
        for transition in &definition.transitions {
            let shared = Arc::new(transition.clone());
            for &to in &transition.activate {
                self.add(to, from);
                self.edges
                    .entry((from, to))
                    .or_insert_with(|| Arc::clone(&shared));
            }
        }
    }

    /// Record a transition from `from` into `to`.
    ///
    /// `PREVIOUS` is only recorded as a source in the forward table; its
    /// concrete predecessors are resolved through the hidden-state table.
    pub fn add(&mut self, to: StateId, from: StateId) {
        if from != StateId::PREVIOUS {
            self.incoming.entry(to).or_default().insert(from);
        }
        self.outgoing.entry(from).or_default().insert(to);
    }

    /// `covering` now hides each state in `hidden`.
    pub fn add_hidden(&mut self, covering: StateId, hidden: &StateSet) {
        for &state in hidden {
            self.incoming_to_hidden
                .entry(state)
                .or_default()
                .insert(covering);
        }
    }

    /// `covering` was closed and no longer hides anything.
    pub fn remove_hidden(&mut self, covering: StateId, hidden: &StateSet) {
        for state in hidden {
            if let Some(coverers) = self.incoming_to_hidden.get_mut(state) {
                coverers.remove(&covering);
                if coverers.is_empty() {
                    self.incoming_to_hidden.remove(state);
                }
            }
        }
    }

    /// States with a transition into `state`, including states currently
    /// hiding it. Unknown states have no predecessors.
    pub fn predecessors(&self, state: StateId) -> StateSet {
        let mut parents = StateSet::new();
        if let Some(set) = self.incoming.get(&state) {
            parents.extend(set.iter().copied());
        }
        if let Some(set) = self.incoming_to_hidden.get(&state) {
            parents.extend(set.iter().copied());
        }
        trace!(%state, predecessors = parents.len(), "resolved predecessors");
        parents
    }

    /// Union of the predecessors of every state in `states`.
    pub fn predecessors_of(&self, states: &StateSet) -> StateSet {
        states
            .iter()
            .flat_map(|&state| self.predecessors(state))
            .collect()
    }

    /// States reachable from `state` through one transition.
    pub fn successors(&self, state: StateId) -> StateSet {
        self.outgoing.get(&state).cloned().unwrap_or_default()
    }

    pub fn successors_of(&self, states: &StateSet) -> StateSet {
        states
            .iter()
            .flat_map(|&state| self.successors(state))
            .collect()
    }

    /// Transition registered for the `from -> to` edge, if any.
    pub fn transition(&self, from: StateId, to: StateId) -> Option<TransitionRef> {
        self.edges.get(&(from, to)).cloned()
    }

    pub fn incoming(&self) -> &BTreeMap<StateId, StateSet> {
        &self.incoming
    }

    pub fn outgoing(&self) -> &BTreeMap<StateId, StateSet> {
        &self.outgoing
    }

    pub fn incoming_to_hidden(&self) -> &BTreeMap<StateId, StateSet> {
        &self.incoming_to_hidden
    }

    /// Static incoming table merged with the hidden-state table.
    pub fn incoming_with_hidden(&self) -> BTreeMap<StateId, StateSet> {
        let mut merged = self.incoming.clone();
        for (state, coverers) in &self.incoming_to_hidden {
            merged
                .entry(*state)
                .or_default()
                .extend(coverers.iter().copied());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty() && self.incoming_to_hidden.is_empty()
    }
}

impl fmt::Display for TransitionGraphIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TransitionGraphIndex")?;
        write_table(f, "incoming transitions to", &self.incoming)?;
        write_table(f, "outgoing transitions from", &self.outgoing)?;
        write_table(f, "incoming transitions to hidden", &self.incoming_to_hidden)
    }
}

fn write_table(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    table: &BTreeMap<StateId, StateSet>,
) -> fmt::Result {
    for (state, others) in table {
        write!(f, "{label} {state}:")?;
        for other in others {
            write!(f, " {other}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
