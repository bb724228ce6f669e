//! # Page Cache
//!
//! Chunks fetched from a list endpoint, keyed by page number, plus the
//! bookkeeping needed to derive a page count and to patch the cache after a
//! confirmed mutation without re-fetching.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Optimistic Cache Reconciliation                      │
//! │                                                                         │
//! │  Mutation confirmed        Cache change                     total       │
//! │  ──────────────────        ────────────                     ─────       │
//! │                                                                         │
//! │  create(e) ─────────────►  page 1: [e, a, b, c]              +1         │
//! │                                                                         │
//! │  update(e') ────────────►  every page: row with id(e') → e'  =          │
//! │                            (rows with other ids untouched)             │
//! │                                                                         │
//! │  delete(id) ────────────►  every page: drop rows with id     -1 (≥ 0)   │
//! │                                                                         │
//! │  Patches run only after the backend confirmed the mutation, so a       │
//! │  failed call never needs a rollback.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::entity::{Entity, EntityId};
use crate::page::{PageCount, PageResponse};

/// Fetched chunks for one query.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    /// Page number → rows, in the order the backend returned them.
    pages: BTreeMap<u32, Vec<T>>,

    /// Total reported by the most recent response (if any).
    total: Option<u64>,

    /// `has_next` of the highest page fetched so far.
    has_more: bool,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        PageCache {
            pages: BTreeMap::new(),
            total: None,
            has_more: false,
        }
    }
}

impl<T: Entity> PageCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the response for `page`, replacing any earlier copy.
    pub fn store(&mut self, page: u32, response: PageResponse<T>) {
        let is_highest = self.highest_page().map_or(true, |h| page >= h);

        if response.total.is_some() {
            self.total = response.total;
        }
        if is_highest {
            self.has_more = response.has_next;
        }

        self.pages.insert(page, response.data);
    }

    /// Rows of a cached page.
    pub fn page(&self, page: u32) -> Option<&[T]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    #[inline]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn highest_page(&self) -> Option<u32> {
        self.pages.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Drops every chunk (query changed or explicit refetch).
    pub fn clear(&mut self) {
        self.pages.clear();
        self.total = None;
        self.has_more = false;
    }

    /// Number of addressable pages for `page_size`.
    ///
    /// ## Rules
    /// - Total known: `ceil(total / page_size)`, exact
    /// - Total unknown: highest fetched page, `+1` while the source says more
    ///   exist; a lower bound until the last page has been seen
    pub fn page_count(&self, page_size: u32) -> PageCount {
        if let Some(total) = self.total {
            return PageCount::from_total(total, page_size);
        }

        let fetched = self.highest_page().unwrap_or(0);
        if self.has_more {
            PageCount::at_least(fetched + 1)
        } else {
            PageCount::exact(fetched)
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Prepends a created entity to page 1 and bumps the total.
    ///
    /// When page 1 was never fetched there is nothing to prepend to; only the
    /// total moves, and the row shows up with the next fetch of page 1.
    pub fn apply_created(&mut self, entity: T) {
        if let Some(rows) = self.pages.get_mut(&1) {
            rows.insert(0, entity);
        }
        if let Some(total) = self.total.as_mut() {
            *total += 1;
        }
    }

    /// Replaces every cached row whose identifier matches the updated entity.
    ///
    /// Returns how many rows were replaced. An entity without an identifier
    /// matches nothing.
    pub fn apply_updated(&mut self, entity: &T) -> usize {
        let Some(id) = entity.id() else {
            return 0;
        };

        let mut replaced = 0;
        for row in self.pages.values_mut().flatten() {
            if row.id().as_ref() == Some(&id) {
                *row = entity.clone();
                replaced += 1;
            }
        }
        replaced
    }

    /// Removes every cached row with this identifier and decrements the total
    /// (saturating at zero).
    ///
    /// Returns whether anything was removed.
    pub fn apply_deleted(&mut self, id: &EntityId) -> bool {
        let mut removed = false;
        for rows in self.pages.values_mut() {
            let before = rows.len();
            rows.retain(|row| row.id().as_ref() != Some(id));
            removed |= rows.len() != before;
        }

        if let Some(total) = self.total.as_mut() {
            *total = total.saturating_sub(1);
        }
        removed
    }

    /// Whether any cached page holds this identifier.
    pub fn contains_id(&self, id: &EntityId) -> bool {
        self.pages
            .values()
            .flatten()
            .any(|row| row.id().as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Region;

    fn regions(ids: std::ops::RangeInclusive<i64>) -> Vec<Region> {
        ids.map(|i| Region::new(i, format!("R{}", i), format!("Region {}", i), ""))
            .collect()
    }

    fn ids(rows: &[Region]) -> Vec<i64> {
        rows.iter().filter_map(|r| r.id).collect()
    }

    #[test]
    fn test_page_count_with_total() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=5), Some(12), true));
        assert_eq!(cache.page_count(5), PageCount::exact(3));
    }

    #[test]
    fn test_page_count_without_total_is_lower_bound() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=5), None, true));
        assert_eq!(cache.page_count(5), PageCount::at_least(2));

        cache.store(2, PageResponse::new(regions(6..=10), None, true));
        assert_eq!(cache.page_count(5), PageCount::at_least(3));

        cache.store(3, PageResponse::new(regions(11..=12), None, false));
        assert_eq!(cache.page_count(5), PageCount::exact(3));
    }

    #[test]
    fn test_refetching_lower_page_keeps_has_more() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=5), None, true));
        cache.store(2, PageResponse::new(regions(6..=10), None, true));
        // Page 1 re-read does not tell us anything about page 3
        cache.store(1, PageResponse::new(regions(1..=5), None, true));
        assert!(cache.has_more());
        assert_eq!(cache.page_count(5), PageCount::at_least(3));
    }

    #[test]
    fn test_apply_created_prepends_and_counts() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=3), Some(3), false));

        cache.apply_created(Region::new(99, "NEW", "New Region", ""));

        assert_eq!(ids(cache.page(1).unwrap()), vec![99, 1, 2, 3]);
        assert_eq!(cache.total(), Some(4));
    }

    #[test]
    fn test_apply_updated_only_touches_matching_rows() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=3), Some(6), true));
        cache.store(2, PageResponse::new(regions(4..=6), Some(6), false));

        let replaced = cache.apply_updated(&Region::new(5, "R5", "Renamed", ""));

        assert_eq!(replaced, 1);
        let page2 = cache.page(2).unwrap();
        assert_eq!(page2[1].name_en, "Renamed");
        assert_eq!(page2[0].name_en, "Region 4");
        assert_eq!(page2[2].name_en, "Region 6");
        assert!(cache.page(1).unwrap().iter().all(|r| r.name_en != "Renamed"));
    }

    #[test]
    fn test_apply_updated_without_id_matches_nothing() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=3), Some(3), false));

        let mut orphan = Region::new(1, "R1", "Orphan", "");
        orphan.id = None;

        assert_eq!(cache.apply_updated(&orphan), 0);
        assert_eq!(cache.page(1).unwrap()[0].name_en, "Region 1");
    }

    #[test]
    fn test_apply_deleted_removes_everywhere() {
        let mut cache = PageCache::new();
        cache.store(1, PageResponse::new(regions(1..=3), Some(6), true));
        cache.store(2, PageResponse::new(regions(4..=6), Some(6), false));

        assert!(cache.apply_deleted(&EntityId::Num(4)));
        assert!(!cache.contains_id(&EntityId::Num(4)));
        assert_eq!(cache.total(), Some(5));
    }

    #[test]
    fn test_apply_deleted_total_saturates() {
        let mut cache: PageCache<Region> = PageCache::new();
        cache.store(1, PageResponse::new(Vec::new(), Some(0), false));
        cache.apply_deleted(&EntityId::Num(1));
        assert_eq!(cache.total(), Some(0));
    }
}
