//! Route planning and execution over a transition graph.
//!
//! [`PathFinder`] enumerates every route from the active states to a target,
//! [`PathTraverser`] walks one route through the application's
//! [`TransitionExecutor`], and [`StateNavigator`] combines the two with a
//! clean-and-retry loop.

pub mod collaborators;
pub mod config;
pub mod finder;
pub mod navigator;
pub mod traversal;

pub use collaborators::{
    ActiveStates, FnEvaluator, StateMetadata, StateMetadataLookup, StateRegistry,
    StateTransitionsRegistry, TransitionEvaluator, TransitionExecutor, TransitionRegistry,
};
pub use config::{
    CancellationFlag, ConfigError, NavigatorConfig, PathSelection, SearchLimits, StopReason,
};
pub use finder::{score_path, PathFinder, SearchReport};
pub use navigator::{select_path, NavigationOutcome, StateNavigator};
pub use traversal::trace::{TraceStep, TraversalTrace};
pub use traversal::traverser::{PathTraverser, TraversalState};
