use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::index::TransitionGraphIndex;
use crate::transition::StateTransitions;

/// A [`TransitionGraphIndex`] shared between one writer and many readers.
///
/// Searches hold a read guard for their whole duration, so registration
/// waits until in-flight searches finish and a search never observes a
/// half-registered definition.
#[derive(Debug, Clone, Default)]
pub struct SharedTransitionIndex {
    inner: Arc<RwLock<TransitionGraphIndex>>,
}

impl SharedTransitionIndex {
    pub fn new(index: TransitionGraphIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Read access for a search. A poisoned lock still yields the index:
    /// writers only ever append, so a panicked writer leaves it usable.
    pub fn read(&self) -> RwLockReadGuard<'_, TransitionGraphIndex> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TransitionGraphIndex> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, definition: &StateTransitions) {
        self.write().add_state_transitions(definition);
    }

    /// Replace the whole index in one step.
    pub fn rebuild<'d, I>(&self, definitions: I)
    where
        I: IntoIterator<Item = &'d StateTransitions>,
    {
        let rebuilt = TransitionGraphIndex::from_definitions(definitions);
        *self.write() = rebuilt;
    }

    /// Owned copy of the current index.
    pub fn snapshot(&self) -> TransitionGraphIndex {
        self.read().clone()
    }
}
