//! Two-phase client-side updates.
//!
//! A provisional entity is layered over the confirmed list as soon as the user
//! acts; once the authoritative result arrives the overlay is either replaced by
//! the confirmed entity or dropped (rollback).

pub trait Keyed {
    type Key: PartialEq + Clone;

    fn key(&self) -> Self::Key;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PendingId(u64);

#[derive(Clone, Debug)]
enum Overlay<T> {
    Insert(T),
    Replace(T),
}

#[derive(Clone, Debug)]
pub struct OptimisticList<T> {
    confirmed: Vec<T>,
    overlays: Vec<(PendingId, Overlay<T>)>,
    next_pending: u64,
}

impl<T: Keyed + Clone> OptimisticList<T> {
    pub fn new() -> Self {
        Self {
            confirmed: Vec::new(),
            overlays: Vec::new(),
            next_pending: 1,
        }
    }

    /// Replaces the authoritative list, newest first. Overlays stay in place.
    pub fn set_confirmed(&mut self, items: Vec<T>) {
        self.confirmed = items;
    }

    pub fn begin_insert(&mut self, provisional: T) -> PendingId {
        let id = self.alloc();
        self.overlays.push((id, Overlay::Insert(provisional)));
        id
    }

    pub fn begin_replace(&mut self, provisional: T) -> PendingId {
        let id = self.alloc();
        self.overlays.push((id, Overlay::Replace(provisional)));
        id
    }

    pub fn is_pending(&self, id: PendingId) -> bool {
        self.overlays.iter().any(|(pending, _)| *pending == id)
    }

    pub fn has_pending(&self) -> bool {
        !self.overlays.is_empty()
    }

    /// Settles a pending overlay. `Some` confirms (upserting the authoritative
    /// entity), `None` rolls back. Returns false for an unknown id.
    pub fn reconcile(&mut self, id: PendingId, confirmed: Option<T>) -> bool {
        let Some(index) = self.overlays.iter().position(|(pending, _)| *pending == id) else {
            return false;
        };
        self.overlays.remove(index);

        if let Some(entity) = confirmed {
            let key = entity.key();
            match self.confirmed.iter().position(|item| item.key() == key) {
                Some(existing) => self.confirmed[existing] = entity,
                None => self.confirmed.insert(0, entity),
            }
        }
        true
    }

    /// Confirmed entities with pending replacements applied and pending
    /// inserts in front, most recent first.
    pub fn view(&self) -> Vec<T> {
        let mut items = self.confirmed.clone();
        for (_, overlay) in &self.overlays {
            if let Overlay::Replace(provisional) = overlay {
                let key = provisional.key();
                if let Some(slot) = items.iter_mut().find(|item| item.key() == key) {
                    *slot = provisional.clone();
                }
            }
        }

        let inserts = self.overlays.iter().rev().filter_map(|(_, overlay)| match overlay {
            Overlay::Insert(provisional) => Some(provisional.clone()),
            Overlay::Replace(_) => None,
        });
        inserts.chain(items).collect()
    }

    fn alloc(&mut self) -> PendingId {
        let id = PendingId(self.next_pending);
        self.next_pending = self.next_pending.saturating_add(1);
        id
    }
}

impl<T: Keyed + Clone> Default for OptimisticList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/optimistic.rs"]
mod tests;
