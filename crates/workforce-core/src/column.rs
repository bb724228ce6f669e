//! # Column Descriptors
//!
//! A column descriptor tells the table renderer how to label and fill one
//! column for one entity type. The renderer itself knows nothing about the
//! entity; only descriptors read its fields.
//!
//! ## Descriptor Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ColumnDescriptor<Region>                                               │
//! │  ├── key:      "name"          unique within the table                  │
//! │  ├── header:   "Name"          header cell label                        │
//! │  ├── width:    Some("40%")     optional CSS width                       │
//! │  └── accessor: |region, ctx| Cell::text(region.display_name(ctx))       │
//! │                 pure function of (item, render context)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::render::RenderContext;
use crate::validation::validate_column_key;

// =============================================================================
// Cell
// =============================================================================

/// A rendered cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Cell {
    Text(String),
    Number(i64),
    Flag(bool),
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    Date(String),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn date(d: NaiveDate) -> Self {
        Cell::Date(d.format("%Y-%m-%d").to_string())
    }

    /// `Text` for a non-blank value, `Empty` otherwise.
    pub fn opt_text(s: Option<&str>) -> Self {
        match s {
            Some(s) if !s.trim().is_empty() => Cell::Text(s.to_string()),
            _ => Cell::Empty,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) | Cell::Date(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Flag(true) => write!(f, "✓"),
            Cell::Flag(false) => write!(f, "✗"),
            Cell::Empty => write!(f, "-"),
        }
    }
}

// =============================================================================
// Column Descriptor
// =============================================================================

type Accessor<T> = Arc<dyn Fn(&T, &RenderContext) -> Cell + Send + Sync>;

/// How to label and render one column of a `T` table.
pub struct ColumnDescriptor<T> {
    key: String,
    header: String,
    width: Option<String>,
    accessor: Accessor<T>,
}

impl<T> ColumnDescriptor<T> {
    /// Creates a descriptor. The accessor must be free of side effects.
    pub fn new<F>(key: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T, &RenderContext) -> Cell + Send + Sync + 'static,
    {
        ColumnDescriptor {
            key: key.into(),
            header: header.into(),
            width: None,
            accessor: Arc::new(accessor),
        }
    }

    /// Sets a fixed width (any CSS length).
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn width_hint(&self) -> Option<&str> {
        self.width.as_deref()
    }

    /// Renders this column for one item.
    #[inline]
    pub fn render(&self, item: &T, ctx: &RenderContext) -> Cell {
        (self.accessor)(item, ctx)
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        ColumnDescriptor {
            key: self.key.clone(),
            header: self.header.clone(),
            width: self.width.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> std::fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Column Set
// =============================================================================

/// An ordered column set with unique, well-formed keys.
#[derive(Debug)]
pub struct Columns<T> {
    columns: Vec<ColumnDescriptor<T>>,
}

impl<T> Clone for Columns<T> {
    fn clone(&self) -> Self {
        Columns {
            columns: self.columns.clone(),
        }
    }
}

impl<T> Columns<T> {
    /// Builds a column set, rejecting blank or repeated keys.
    pub fn new(columns: Vec<ColumnDescriptor<T>>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            validate_column_key(&column.key)?;
            if !seen.insert(column.key.as_str()) {
                return Err(CoreError::DuplicateColumnKey(column.key.clone()));
            }
        }

        Ok(Columns { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter()
    }

    /// Renders every column for one item, in order.
    pub fn render_row(&self, item: &T, ctx: &RenderContext) -> Vec<Cell> {
        self.columns.iter().map(|c| c.render(item, ctx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        name_ar: &'static str,
        count: i64,
    }

    fn row() -> Row {
        Row {
            name: "North",
            name_ar: "الشمال",
            count: 3,
        }
    }

    #[test]
    fn test_accessor_uses_context() {
        let col = ColumnDescriptor::new("name", "Name", |r: &Row, ctx: &RenderContext| {
            Cell::text(if ctx.is_rtl() { r.name_ar } else { r.name })
        });

        assert_eq!(col.render(&row(), &RenderContext::ltr("en")), Cell::text("North"));
        assert_eq!(col.render(&row(), &RenderContext::rtl("ar")), Cell::text("الشمال"));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = Columns::new(vec![
            ColumnDescriptor::new("name", "Name", |r: &Row, _: &RenderContext| Cell::text(r.name)),
            ColumnDescriptor::new("name", "Arabic", |r: &Row, _: &RenderContext| {
                Cell::text(r.name_ar)
            }),
        ]);

        assert!(matches!(result, Err(CoreError::DuplicateColumnKey(k)) if k == "name"));
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = Columns::new(vec![ColumnDescriptor::new("", "Count", |r: &Row, _: &RenderContext| {
            Cell::Number(r.count)
        })]);

        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_render_row_keeps_order_and_width() {
        let columns = Columns::new(vec![
            ColumnDescriptor::new("count", "Count", |r: &Row, _: &RenderContext| Cell::Number(r.count))
                .width("10%"),
            ColumnDescriptor::new("name", "Name", |r: &Row, _: &RenderContext| Cell::text(r.name)),
        ])
        .unwrap();

        let cells = columns.render_row(&row(), &RenderContext::default());
        assert_eq!(cells, vec![Cell::Number(3), Cell::text("North")]);
        assert_eq!(columns.iter().next().unwrap().width_hint(), Some("10%"));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Empty.to_string(), "-");
        assert_eq!(Cell::opt_text(Some("  ")), Cell::Empty);
        assert_eq!(
            Cell::date(NaiveDate::from_ymd_opt(2024, 9, 23).unwrap()).to_string(),
            "2024-09-23"
        );
    }
}
