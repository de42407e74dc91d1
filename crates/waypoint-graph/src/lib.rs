pub mod index;
pub mod reachability;
pub mod shared;
pub mod state;
pub mod transition;

pub use index::TransitionGraphIndex;
pub use shared::SharedTransitionIndex;
pub use state::{state_set, SpecialState, StateId, StateSet};
pub use transition::{StateTransition, StateTransitions, StaysVisible, TransitionRef};

/// Errors raised while building the transition graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid transition definitions: {0}")]
    Json(#[from] serde_json::Error),
}
