use super::tabs::{TabAction, TabState};
use crate::models::ProjectId;
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Tab state per project. Each transition builds a new `TabState` and swaps it
/// in whole, so a snapshot is never half-updated.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<FxHashMap<ProjectId, Arc<TabState>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; projects never touched read as empty.
    pub fn snapshot(&self, project: ProjectId) -> Arc<TabState> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&project)
            .cloned()
            .unwrap_or_default()
    }

    /// Applies one transition, creating the session lazily. Returns the new
    /// snapshot and whether anything changed.
    pub fn dispatch(&self, project: ProjectId, action: TabAction) -> (Arc<TabState>, bool) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let current = sessions.entry(project).or_default();
        let mut next = TabState::clone(current);
        let changed = next.dispatch(action);
        if changed {
            *current = Arc::new(next);
        }
        (Arc::clone(current), changed)
    }

    /// Drops the session when its project view is exited.
    pub fn discard(&self, project: ProjectId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&project)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/session/registry.rs"]
mod tests;
