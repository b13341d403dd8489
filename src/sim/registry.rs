//! Arena-style entity storage
//!
//! Entries keep insertion order so per-frame iteration is deterministic.
//! IDs come from the map's single counter and are never reused.

use serde::{Deserialize, Serialize};

/// Stable identifier of a live entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Ordered collection of entities keyed by `EntityId`
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<(EntityId, T)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under a freshly allocated ID
    pub fn insert(&mut self, id: EntityId, value: T) {
        debug_assert!(!self.contains(id), "duplicate entity id {:?}", id);
        self.entries.push((id, value));
    }

    /// Unregister an entity, returning it if it was present
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, value)| value)
    }

    /// Borrow two distinct entries mutably at once.
    /// If both IDs are equal only the first slot is filled.
    pub fn get2_mut(&mut self, a: EntityId, b: EntityId) -> (Option<&mut T>, Option<&mut T>) {
        let index_a = self.index_of(a);
        let index_b = self.index_of(b);

        match (index_a, index_b) {
            (Some(ia), Some(ib)) if ia == ib => (Some(&mut self.entries[ia].1), None),
            (Some(ia), Some(ib)) => {
                let (low, high) = (ia.min(ib), ia.max(ib));
                let (head, tail) = self.entries.split_at_mut(high);
                let low_ref = &mut head[low].1;
                let high_ref = &mut tail[0].1;
                if ia < ib {
                    (Some(low_ref), Some(high_ref))
                } else {
                    (Some(high_ref), Some(low_ref))
                }
            }
            (Some(ia), None) => (Some(&mut self.entries[ia].1), None),
            (None, Some(ib)) => (None, Some(&mut self.entries[ib].1)),
            (None, None) => (None, None),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entries.iter_mut().map(|(id, value)| (*id, value))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Remove every entry matching `predicate`, returning them in order
    pub fn extract_if(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<(EntityId, T)> {
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut removed = Vec::new();
        for (id, value) in self.entries.drain(..) {
            if predicate(&value) {
                removed.push((id, value));
            } else {
                kept.push((id, value));
            }
        }
        self.entries = kept;
        removed
    }

    /// Remove every entry, returning them in order
    pub fn drain(&mut self) -> Vec<(EntityId, T)> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }
}
