//! # List-State Engine
//!
//! The synchronous heart of every list screen: paginated, searchable,
//! multi-selectable state for one entity collection. It never performs I/O.
//! Whenever it needs data it hands out a [`FetchTicket`]; the async
//! controller runs the request and feeds the result back through
//! [`ListState::complete_fetch`].
//!
//! ## Ticket Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Request / Response Tickets                        │
//! │                                                                         │
//! │  User action              Engine                   Controller           │
//! │  ───────────              ──────                   ──────────           │
//! │                                                                         │
//! │  type "nor" ───────────►  type_search()            (debounce timer)     │
//! │  quiet 500ms ──────────►  apply_search() ─ ticket ─► list(query)        │
//! │  click page 3 ─────────►  request_page(3) ─ ticket ─► list(query)       │
//! │                                                    │                    │
//! │                           complete_fetch(ticket) ◄─┘                    │
//! │                                                                         │
//! │  Each ticket carries:                                                   │
//! │  • generation: bumped when the query identity changes (search, page    │
//! │    size, filters, refetch). Older generations are discarded: STALE.    │
//! │  • seq: bumped on every navigation. An older seq of the current        │
//! │    generation is still cached but not displayed: SUPERSEDED.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Page Addressing
//! The backend is queried page by page, while the pager addresses pages at
//! random. Fetched chunks accumulate in a [`PageCache`] keyed by page number;
//! the visible rows are always exactly the cached chunk of the current page.
//! Out-of-range page requests are ignored, never raised as errors.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use ts_rs::TS;

use crate::cache::PageCache;
use crate::entity::{Entity, EntityId};
use crate::error::CoreResult;
use crate::page::{ListQuery, PageCount, PageResponse};
use crate::selection::Selection;
use crate::validation::{validate_page_size, validate_search_query};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Tickets & Outcomes
// =============================================================================

/// A pending list request issued by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    seq: u64,
    /// The query to send to the data source.
    pub query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }
}

/// What `request_page` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Outside `1..=page_count`; state unchanged.
    Ignored,
    /// Page was cached and is now current.
    Ready,
    /// Page must be fetched first; it becomes current when the ticket completes.
    Fetch(FetchTicket),
}

/// What `complete_fetch` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response became the visible page (or its error the visible error).
    Applied,
    /// Newer navigation happened; the chunk was cached but not shown.
    Superseded,
    /// Query changed since the request was issued; response discarded.
    Stale,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of the list state handed to the page and the table.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub selected: Vec<EntityId>,
    /// Search box contents (may not have been sent yet).
    pub search: String,
    pub page: u32,
    pub page_size: u32,
    pub page_count: PageCount,
    pub total: Option<u64>,
    pub all_checked: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

// =============================================================================
// List State
// =============================================================================

/// Paginated, searchable, selectable state for one entity collection.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    cache: PageCache<T>,
    selection: Selection,
    /// Every identifier the engine has ever received.
    seen: HashSet<EntityId>,
    /// Search box contents, updated on every keystroke.
    search_input: String,
    /// Search in effect for the cached data.
    search: String,
    filters: BTreeMap<String, String>,
    page: u32,
    page_size: u32,
    loading: bool,
    error: Option<String>,
    generation: u64,
    seq: u64,
}

impl<T: Entity> ListState<T> {
    /// Creates an empty state. An invalid page size falls back to the default.
    pub fn new(page_size: u32) -> Self {
        let page_size = if validate_page_size(page_size).is_ok() {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        ListState {
            cache: PageCache::new(),
            selection: Selection::new(),
            seen: HashSet::new(),
            search_input: String::new(),
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            page_size,
            loading: false,
            error: None,
            generation: 0,
            seq: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn applied_search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total(&self) -> Option<u64> {
        self.cache.total()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page_count(&self) -> PageCount {
        self.cache.page_count(self.page_size)
    }

    /// Rows of the current page; empty while it is being fetched.
    pub fn items(&self) -> &[T] {
        self.cache.page(self.page).unwrap_or(&[])
    }

    /// Identifiers of the current page's well-formed rows.
    pub fn visible_ids(&self) -> Vec<EntityId> {
        self.items().iter().filter_map(Entity::id).collect()
    }

    pub fn all_checked(&self) -> bool {
        self.selection.all_checked(&self.visible_ids())
    }

    /// The query for the current page.
    pub fn query(&self) -> ListQuery {
        self.query_for(self.page)
    }

    fn query_for(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            page_size: self.page_size,
            search: self.search.clone(),
            filters: self.filters.clone(),
        }
    }

    // =========================================================================
    // Query Changes
    // =========================================================================

    fn issue(&mut self, page: u32) -> FetchTicket {
        self.seq += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            seq: self.seq,
            query: self.query_for(page),
        }
    }

    /// Drops all cached data and starts a new query generation at page 1.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.cache.clear();
        self.page = 1;
        self.error = None;
    }

    /// Ticket for the first load after mount.
    pub fn begin_load(&mut self) -> FetchTicket {
        self.issue(self.page)
    }

    /// Records a keystroke in the search box. No request is issued.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    /// Applies a settled search: resets to page 1 and starts a new query.
    ///
    /// Returns `None` when the trimmed text equals the search in effect.
    pub fn apply_search(&mut self, text: &str) -> CoreResult<Option<FetchTicket>> {
        self.search_input = text.to_string();
        let search = validate_search_query(text)?;
        if search == self.search {
            return Ok(None);
        }

        self.search = search;
        self.invalidate();
        Ok(Some(self.issue(1)))
    }

    /// Replaces the page size: resets to page 1 and starts a new query.
    pub fn set_page_size(&mut self, page_size: u32) -> CoreResult<Option<FetchTicket>> {
        validate_page_size(page_size)?;
        if page_size == self.page_size {
            return Ok(None);
        }

        self.page_size = page_size;
        self.invalidate();
        Ok(Some(self.issue(1)))
    }

    /// Sets an entity-specific filter; behaves like a page-size change.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<FetchTicket> {
        let key = key.into();
        let value = value.into();
        if self.filters.get(&key) == Some(&value) {
            return None;
        }

        self.filters.insert(key, value);
        self.invalidate();
        Some(self.issue(1))
    }

    /// Removes an entity-specific filter.
    pub fn clear_filter(&mut self, key: &str) -> Option<FetchTicket> {
        self.filters.remove(key)?;
        self.invalidate();
        Some(self.issue(1))
    }

    /// Re-reads the current page without changing any filter.
    ///
    /// Every cached chunk is dropped so later navigation re-reads too.
    pub fn refetch(&mut self) -> FetchTicket {
        let page = self.page;
        self.invalidate();
        self.page = page;
        self.issue(page)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Asks for page `n`.
    ///
    /// ## Behavior
    /// - `n` outside `1..=page_count`: ignored
    /// - `n` cached: becomes current immediately
    /// - otherwise: a ticket is issued and `n` becomes current once it completes
    pub fn request_page(&mut self, n: u32) -> PageRequest {
        if !self.page_count().contains(n) {
            return PageRequest::Ignored;
        }

        if self.cache.contains(n) {
            // Anything still in flight for another page must not take over.
            self.seq += 1;
            self.page = n;
            self.loading = false;
            return PageRequest::Ready;
        }

        PageRequest::Fetch(self.issue(n))
    }

    /// Feeds a response (or a human-readable failure) back into the state.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<PageResponse<T>, String>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale;
        }
        let is_current = ticket.seq == self.seq;

        match result {
            Ok(mut response) => {
                response.data.truncate(ticket.query.page_size as usize);
                self.seen.extend(response.data.iter().filter_map(Entity::id));
                self.cache.store(ticket.query.page, response);

                if !is_current {
                    return FetchOutcome::Superseded;
                }
                self.page = ticket.query.page;
                self.loading = false;
                self.error = None;
                FetchOutcome::Applied
            }
            Err(message) => {
                if !is_current {
                    return FetchOutcome::Stale;
                }
                self.loading = false;
                self.error = Some(message);
                FetchOutcome::Applied
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles one row. Identifiers never received from the backend are
    /// ignored; returns whether the selection changed.
    pub fn select_item(&mut self, id: EntityId) -> bool {
        if !self.seen.contains(&id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Select-all checkbox over the visible rows.
    pub fn select_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.toggle_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drops these identifiers from the selection, leaving the cache alone.
    pub fn deselect(&mut self, ids: &[EntityId]) {
        for id in ids {
            self.selection.remove(id);
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Patches the cache after a confirmed create.
    pub fn apply_created(&mut self, entity: T) {
        if let Some(id) = entity.id() {
            self.seen.insert(id);
        }
        self.cache.apply_created(entity);
    }

    /// Patches the cache after a confirmed update. Returns rows replaced.
    pub fn apply_updated(&mut self, entity: &T) -> usize {
        self.cache.apply_updated(entity)
    }

    /// Patches the cache and selection after a confirmed delete.
    ///
    /// If the current page is no longer addressable (last row of the last
    /// page deleted) the state moves to the new last page; a ticket is
    /// returned when that page still has to be fetched.
    pub fn apply_deleted(&mut self, id: &EntityId) -> Option<FetchTicket> {
        self.cache.apply_deleted(id);
        self.selection.remove(id);

        let count = self.page_count();
        let last = count.count.max(1);
        if !count.is_exact || self.page <= last {
            return None;
        }

        if self.cache.contains(last) {
            self.seq += 1;
            self.page = last;
            None
        } else {
            Some(self.issue(last))
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            items: self.items().to_vec(),
            selected: self.selection.to_vec(),
            search: self.search_input.clone(),
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count(),
            total: self.total(),
            all_checked: self.all_checked(),
            is_loading: self.loading,
            error: self.error.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
