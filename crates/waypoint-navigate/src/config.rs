//! Search limits and navigator configuration.
//!
//! Path enumeration on a densely connected graph can produce combinatorially
//! many routes. None of the limits below is part of the search contract; they
//! let latency-sensitive callers bound the work. When a limit is hit the
//! finder returns the paths found so far rather than failing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Caps on a single path search. `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Longest route, in states, that the search will build.
    pub max_depth: Option<usize>,
    /// Stop after this many complete routes.
    pub max_paths: Option<usize>,
    /// Stop after expanding this many search nodes.
    pub max_expansions: Option<u64>,
    /// Stable ascending sort of the result by score.
    pub sort_by_score: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_paths: None,
            max_expansions: None,
            sort_by_score: true,
        }
    }
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every simple route was explored.
    Exhausted,
    /// `max_paths` routes were found.
    PathLimit,
    /// `max_expansions` search nodes were expanded.
    ExpansionLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Cooperative cancellation for a running search, checked at every
/// expansion. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Which candidate the navigator traverses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSelection {
    /// First path after an ascending sort by score.
    #[default]
    LowestScore,
    HighestScore,
    /// Fewest states; ties keep search order.
    Shortest,
}

/// Configuration for [`StateNavigator`](crate::navigator::StateNavigator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub search: SearchLimits,
    /// Traversal attempts before giving up on a target.
    pub max_attempts: u32,
    pub selection: PathSelection,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            search: SearchLimits::default(),
            max_attempts: 10,
            selection: PathSelection::default(),
        }
    }
}

impl NavigatorConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid navigator config: {0}")]
    Json(#[from] serde_json::Error),
}
