use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for a state in the automation graph.
///
/// Negative ids are reserved for the special states in [`SpecialState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub i64);

impl StateId {
    pub const UNKNOWN: StateId = StateId(-1);
    pub const PREVIOUS: StateId = StateId(-2);
    pub const CURRENT: StateId = StateId(-3);
    pub const EXPECTED: StateId = StateId(-4);
    /// "No state". Public results use `Option<StateId>` instead where possible.
    pub const NULL: StateId = StateId(-5);

    pub fn new(id: i64) -> Self {
        StateId(id)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_special(self) -> bool {
        SpecialState::from_id(self).is_some()
    }

    pub fn is_null(self) -> bool {
        self == StateId::NULL
    }
}

impl From<i64> for StateId {
    fn from(id: i64) -> Self {
        StateId(id)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match SpecialState::from_id(*self) {
            Some(special) => write!(f, "{special}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Reserved states that stand in for "whatever applies" rather than a
/// concrete screen configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialState {
    /// Catch-all when no other state is recognized.
    Unknown,
    /// Whatever state was covered by the one being closed.
    Previous,
    Current,
    Expected,
    Null,
}

impl SpecialState {
    pub fn id(self) -> StateId {
        match self {
            SpecialState::Unknown => StateId::UNKNOWN,
            SpecialState::Previous => StateId::PREVIOUS,
            SpecialState::Current => StateId::CURRENT,
            SpecialState::Expected => StateId::EXPECTED,
            SpecialState::Null => StateId::NULL,
        }
    }

    pub fn from_id(id: StateId) -> Option<Self> {
        match id {
            StateId::UNKNOWN => Some(SpecialState::Unknown),
            StateId::PREVIOUS => Some(SpecialState::Previous),
            StateId::CURRENT => Some(SpecialState::Current),
            StateId::EXPECTED => Some(SpecialState::Expected),
            StateId::NULL => Some(SpecialState::Null),
            _ => None,
        }
    }
}

impl fmt::Display for SpecialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecialState::Unknown => "UNKNOWN",
            SpecialState::Previous => "PREVIOUS",
            SpecialState::Current => "CURRENT",
            SpecialState::Expected => "EXPECTED",
            SpecialState::Null => "NULL",
        };
        f.write_str(name)
    }
}

/// Set of state ids. Ordered so that searches over it are deterministic.
pub type StateSet = BTreeSet<StateId>;

/// Build a [`StateSet`] from raw ids.
pub fn state_set<I>(ids: I) -> StateSet
where
    I: IntoIterator,
    I::Item: Into<StateId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_ids_round_trip() {
        for special in [
            SpecialState::Unknown,
            SpecialState::Previous,
            SpecialState::Current,
            SpecialState::Expected,
            SpecialState::Null,
        ] {
            assert_eq!(SpecialState::from_id(special.id()), Some(special));
            assert!(special.id().is_special());
        }
        assert!(!StateId(7).is_special());
    }

    #[test]
    fn display_names_special_states() {
        assert_eq!(StateId(42).to_string(), "42");
        assert_eq!(StateId::PREVIOUS.to_string(), "PREVIOUS");
        assert!(StateId::NULL.is_null());
    }

    #[test]
    fn state_set_from_raw_ids() {
        let set = state_set([3i64, 1, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().next(), Some(&StateId(1)));
    }
}
