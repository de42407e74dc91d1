use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::state::{StateId, StateSet};

/// Whether the source state remains on screen after a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaysVisible {
    /// Defer to the owning [`StateTransitions`] default.
    #[default]
    None,
    True,
    False,
}

/// A directed edge out of one state, backed by an executable action sequence
/// that lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateTransition {
    /// Label used in logs and traces.
    #[serde(default)]
    pub id: String,
    /// States this transition opens.
    #[serde(default)]
    pub activate: StateSet,
    /// States this transition closes. Carried for the executor; the graph
    /// index only follows `activate`.
    #[serde(default)]
    pub exit: StateSet,
    #[serde(default)]
    pub stays_visible: StaysVisible,
    /// Preference weight of the transition itself, for the embedding
    /// application. Route scores sum state path scores only.
    #[serde(default)]
    pub score: i32,
}

impl StateTransition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn activating<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateId>,
    {
        self.activate.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn exiting<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateId>,
    {
        self.exit.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn with_stays_visible(mut self, stays_visible: StaysVisible) -> Self {
        self.stays_visible = stays_visible;
        self
    }
}

/// Shared handle to a transition definition. Paths hold these so that
/// copying a path never duplicates the definition itself.
pub type TransitionRef = Arc<StateTransition>;

/// All transitions owned by one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransitions {
    pub state_id: StateId,
    /// Outgoing transitions.
    #[serde(default)]
    pub transitions: Vec<StateTransition>,
    /// Run when this state is the destination, to confirm arrival.
    #[serde(default)]
    pub finish: StateTransition,
    /// States this one covers when it appears.
    #[serde(default)]
    pub hidden: StateSet,
    /// Default for transitions whose `stays_visible` is `None`.
    #[serde(default)]
    pub stays_visible_after_transition: bool,
}

impl StateTransitions {
    pub fn new(state_id: StateId) -> Self {
        Self {
            state_id,
            transitions: Vec::new(),
            finish: StateTransition::new("finish"),
            hidden: StateSet::new(),
            stays_visible_after_transition: false,
        }
    }

    pub fn with_transition(mut self, transition: StateTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_finish(mut self, finish: StateTransition) -> Self {
        self.finish = finish;
        self
    }

    pub fn with_hidden<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateId>,
    {
        self.hidden.extend(states.into_iter().map(Into::into));
        self
    }

    /// First transition that activates `to`.
    pub fn transition_to(&self, to: StateId) -> Option<&StateTransition> {
        self.transitions.iter().find(|t| t.activate.contains(&to))
    }

    /// Whether this state is still visible after transitioning to `to`.
    pub fn stays_visible(&self, to: StateId) -> bool {
        match self.transition_to(to).map(|t| t.stays_visible) {
            Some(StaysVisible::True) => true,
            Some(StaysVisible::False) => false,
            _ => self.stays_visible_after_transition,
        }
    }
}
