//! Incrementally maintained reverse index for id-based joins.

use crate::types::RecordId;
use std::collections::HashMap;

/// Maps a parent record id to the ids of its dependent records.
///
/// The index is rebuilt once when the store opens and then maintained
/// incrementally on every dependent insert/remove (and on foreign-key
/// changes, as a remove-then-insert). Lookups are O(1) plus the size of
/// the result.
///
/// Deleting a parent drops its entry but never touches the dependents —
/// cascade-free deletion is deliberate; orphans are surfaced by
/// `Store::integrity_report`.
#[derive(Debug, Default)]
pub(crate) struct RefIndex {
    children: HashMap<RecordId, Vec<RecordId>>,
}

impl RefIndex {
    /// Creates an empty index.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds an index from `(parent, child)` pairs, preserving the
    /// iteration order of children under each parent.
    pub(crate) fn build(pairs: impl IntoIterator<Item = (RecordId, RecordId)>) -> Self {
        let mut index = Self::new();
        for (parent, child) in pairs {
            index.insert(parent, child);
        }
        index
    }

    /// Registers `child` under `parent`.
    pub(crate) fn insert(&mut self, parent: RecordId, child: RecordId) {
        self.children.entry(parent).or_default().push(child);
    }

    /// Unregisters `child` from `parent`, if present.
    pub(crate) fn remove_child(&mut self, parent: RecordId, child: RecordId) {
        if let Some(ids) = self.children.get_mut(&parent) {
            ids.retain(|&id| id != child);
            if ids.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Drops the entry for `parent`, returning the ids of its (now
    /// orphaned) dependents.
    pub(crate) fn remove_parent(&mut self, parent: RecordId) -> Vec<RecordId> {
        self.children.remove(&parent).unwrap_or_default()
    }

    /// Returns the dependent ids registered under `parent`, in insertion
    /// order.
    pub(crate) fn children_of(&self, parent: RecordId) -> Vec<RecordId> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let parent = RecordId::new();
        let a = RecordId::new();
        let b = RecordId::new();

        let mut index = RefIndex::new();
        index.insert(parent, a);
        index.insert(parent, b);

        assert_eq!(index.children_of(parent), vec![a, b]);
        assert!(index.children_of(RecordId::new()).is_empty());
    }

    #[test]
    fn remove_child_keeps_siblings() {
        let parent = RecordId::new();
        let a = RecordId::new();
        let b = RecordId::new();

        let mut index = RefIndex::new();
        index.insert(parent, a);
        index.insert(parent, b);
        index.remove_child(parent, a);

        assert_eq!(index.children_of(parent), vec![b]);
    }

    #[test]
    fn remove_parent_returns_orphans() {
        let parent = RecordId::new();
        let a = RecordId::new();

        let mut index = RefIndex::new();
        index.insert(parent, a);

        assert_eq!(index.remove_parent(parent), vec![a]);
        assert!(index.children_of(parent).is_empty());
    }

    #[test]
    fn build_from_pairs() {
        let p1 = RecordId::new();
        let p2 = RecordId::new();
        let c1 = RecordId::new();
        let c2 = RecordId::new();
        let c3 = RecordId::new();

        let index = RefIndex::build(vec![(p1, c1), (p2, c2), (p1, c3)]);
        assert_eq!(index.children_of(p1), vec![c1, c3]);
        assert_eq!(index.children_of(p2), vec![c2]);
    }
}
