//! # Selection Set
//!
//! The set of row identifiers ticked in a table.
//!
//! ## Scope
//! Selection persists across page changes and query changes: ticking rows on
//! page 1, paging to 2 and ticking more accumulates both, so a bulk delete can
//! span pages. Identifiers leave the set only when their entity is deleted or
//! the selection is cleared.

use std::collections::BTreeSet;

use crate::entity::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of one identifier. Calling it twice is a no-op.
    pub fn toggle(&mut self, id: EntityId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select-all checkbox semantics over the visible rows.
    ///
    /// ## Behavior
    /// - Every visible id already selected: removes exactly those
    /// - Otherwise: adds the visible ids not yet selected
    /// - No visible rows: nothing happens
    ///
    /// Identifiers selected on other pages are never touched.
    pub fn toggle_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        let visible: Vec<&EntityId> = visible.into_iter().collect();
        if visible.is_empty() {
            return;
        }

        if visible.iter().all(|id| self.ids.contains(*id)) {
            for id in visible {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible.into_iter().cloned());
        }
    }

    /// True when there is at least one visible row and all are selected.
    pub fn all_checked<'a, I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a EntityId>,
    {
        let mut any = false;
        for id in visible {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<EntityId> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[i64]) -> Vec<EntityId> {
        ns.iter().copied().map(EntityId::Num).collect()
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut selection = Selection::new();
        selection.toggle(EntityId::Num(1));

        let before = selection.clone();
        selection.toggle(EntityId::Num(2));
        selection.toggle(EntityId::Num(2));
        assert_eq!(selection, before);

        selection.toggle(EntityId::Num(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_adds_missing_visible() {
        let mut selection = Selection::new();
        selection.toggle(EntityId::Num(2));

        let visible = nums(&[1, 2, 3]);
        selection.toggle_all(&visible);

        assert_eq!(selection.to_vec(), nums(&[1, 2, 3]));
    }

    #[test]
    fn test_toggle_all_clears_only_visible() {
        let mut selection = Selection::new();
        // Selected on another page
        selection.toggle(EntityId::Num(10));

        let visible = nums(&[1, 2]);
        selection.toggle_all(&visible);
        assert!(selection.all_checked(&visible));

        selection.toggle_all(&visible);
        assert_eq!(selection.to_vec(), nums(&[10]));
    }

    #[test]
    fn test_all_checked_false_when_nothing_visible() {
        let mut selection = Selection::new();
        selection.toggle(EntityId::Num(1));
        assert!(!selection.all_checked(&Vec::new()));

        selection.toggle_all(&Vec::new());
        assert_eq!(selection.len(), 1);
    }
}
