//! # Queries & Page Responses
//!
//! The canonical shapes exchanged with a list endpoint, after the transport
//! layer has normalized whatever envelope the backend actually sent.
//!
//! ## Query → Response
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ListQuery { page: 3, page_size: 5, search: "north", filters: {} }      │
//! │       │                                                                 │
//! │       ▼   GET /regions?page=3&limit=5&search=north                     │
//! │                                                                         │
//! │  PageResponse { data: [r11, r12], total: Some(12), has_next: false }    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PageCount { count: 3, is_exact: true }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// List Query
// =============================================================================

/// One list request: which page, how big, which filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,

    /// Rows per page (> 0).
    pub page_size: u32,

    /// Free-text search, already trimmed. Empty means "no search".
    pub search: String,

    /// Entity-specific filters (`organizationId`, `status`, ...).
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        ListQuery {
            page: page.max(1),
            page_size: page_size.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Zero-based offset of the first row of this page. Page 0 reads as page 1.
    #[inline]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

// =============================================================================
// Page Response
// =============================================================================

/// One chunk of entities as returned by a list endpoint.
///
/// ## Invariant
/// `data.len() <= page_size` of the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,

    /// Total matching rows across all pages, when the backend reports it.
    pub total: Option<u64>,

    /// Whether another page exists after this one.
    pub has_next: bool,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, total: Option<u64>, has_next: bool) -> Self {
        PageResponse {
            data,
            total,
            has_next,
        }
    }

    /// An empty, final page.
    pub fn empty() -> Self {
        PageResponse::new(Vec::new(), Some(0), false)
    }
}

// =============================================================================
// Page Count
// =============================================================================

/// Number of addressable pages.
///
/// When the backend does not report a total, the count is derived from the
/// pages fetched so far and is only a lower bound: `is_exact` stays `false`
/// until the last page has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageCount {
    pub count: u32,
    pub is_exact: bool,
}

impl PageCount {
    pub const fn exact(count: u32) -> Self {
        PageCount {
            count,
            is_exact: true,
        }
    }

    pub const fn at_least(count: u32) -> Self {
        PageCount {
            count,
            is_exact: false,
        }
    }

    /// `ceil(total / page_size)`.
    pub fn from_total(total: u64, page_size: u32) -> Self {
        let page_size = page_size.max(1) as u64;
        let pages = total.div_ceil(page_size);
        PageCount::exact(pages.min(u32::MAX as u64) as u32)
    }

    /// Whether `page` is addressable.
    #[inline]
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.count
    }
}

impl std::fmt::Display for PageCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_exact {
            write!(f, "{}", self.count)
        } else {
            write!(f, "{}+", self.count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_offset() {
        assert_eq!(ListQuery::new(1, 10).offset(), 0);
        assert_eq!(ListQuery::new(3, 5).offset(), 10);
        // Page 0 is coerced to 1
        assert_eq!(ListQuery::new(0, 5).page, 1);
    }

    #[test]
    fn test_offset_of_hand_built_page_zero() {
        let query = ListQuery {
            page: 0,
            ..ListQuery::new(1, 5)
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_count_from_total() {
        assert_eq!(PageCount::from_total(12, 5), PageCount::exact(3));
        assert_eq!(PageCount::from_total(10, 5), PageCount::exact(2));
        assert_eq!(PageCount::from_total(0, 5), PageCount::exact(0));
    }

    #[test]
    fn test_page_count_contains() {
        let count = PageCount::exact(3);
        assert!(!count.contains(0));
        assert!(count.contains(1));
        assert!(count.contains(3));
        assert!(!count.contains(4));
    }

    #[test]
    fn test_page_count_display_marks_estimates() {
        assert_eq!(PageCount::exact(3).to_string(), "3");
        assert_eq!(PageCount::at_least(3).to_string(), "3+");
    }

    #[test]
    fn test_query_serializes_camel_case() {
        let query = ListQuery::new(2, 25).with_filter("organizationId", "4");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["pageSize"], 25);
        assert_eq!(json["filters"]["organizationId"], "4");
    }
}
