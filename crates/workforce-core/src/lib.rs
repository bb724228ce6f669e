//! # workforce-core: Pure List & Table Logic for the Workforce Dashboard
//!
//! Every master-data screen of the dashboard (regions, grades, holidays,
//! biometric terminals, leave types, weekly rosters, ...) is the same screen:
//! a searchable, paginated, multi-selectable table backed by a REST list
//! endpoint. This crate holds that screen's logic once, generically, with
//! zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Workforce Dashboard Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Page composition (per module)                   │   │
//! │  │   Regions page ── Holidays page ── Terminals page ── ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TableIntent / ListSnapshot             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            workforce-client (async controller, HTTP)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ workforce-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ list_state│  │   cache   │  │ selection │  │   table   │  │   │
//! │  │   │  tickets  │  │  chunks   │  │  toggles  │  │ view-model│  │   │
//! │  │   │  paging   │  │ reconcile │  │ select-all│  │  skeleton │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • DETERMINISTIC               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`entity`] - The `Entity` trait and `EntityId`
//! - [`render`] - Rendering context (text direction, locale)
//! - [`column`] - Column descriptors and cell values
//! - [`page`] - Queries, page responses, page counts
//! - [`cache`] - Page cache and mutation reconciliation
//! - [`selection`] - Multi-select set
//! - [`list_state`] - The generic list-state engine
//! - [`table`] - The generic table renderer
//! - [`types`] - HR master-data entities
//! - [`catalog`] - Column sets for the HR entities
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use workforce_core::list_state::{ListState, PageRequest};
//! use workforce_core::page::PageResponse;
//! use workforce_core::types::Region;
//!
//! let mut state: ListState<Region> = ListState::new(5);
//! let ticket = state.begin_load();
//!
//! let regions: Vec<Region> = (1..=5)
//!     .map(|i| Region::new(i, format!("R{}", i), format!("Region {}", i), ""))
//!     .collect();
//! state.complete_fetch(&ticket, Ok(PageResponse::new(regions, Some(12), true)));
//!
//! assert_eq!(state.page_count().count, 3);
//! assert!(matches!(state.request_page(9), PageRequest::Ignored));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod catalog;
pub mod column;
pub mod entity;
pub mod error;
pub mod list_state;
pub mod page;
pub mod render;
pub mod selection;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use column::{Cell, ColumnDescriptor, Columns};
pub use entity::{Entity, EntityId};
pub use error::{CoreError, CoreResult, ValidationError};
pub use list_state::{FetchOutcome, FetchTicket, ListSnapshot, ListState, PageRequest};
pub use page::{ListQuery, PageCount, PageResponse};
pub use render::{RenderContext, TextDirection};
pub use selection::Selection;
pub use table::{render_table, TableIntent, TableProps, TableView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a screen does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a list endpoint is asked for.
///
/// The backend caps `limit` at 100; larger requests come back truncated and
/// would break the `data.len() <= page_size` contract.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page sizes offered by the pager next to every table.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 25, 50];

/// Quiet period before a typed search is sent to the backend.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Bounds on the number of skeleton rows shown while loading.
///
/// The skeleton count is `clamp(page_size, MIN, MAX)` so the table keeps its
/// height between the loading and loaded states.
pub const MIN_SKELETON_ROWS: u32 = 3;
pub const MAX_SKELETON_ROWS: u32 = 8;

/// Maximum length of a search query, in characters.
pub const MAX_SEARCH_LEN: usize = 100;
