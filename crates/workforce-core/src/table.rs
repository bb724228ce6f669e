//! # Generic Table Renderer
//!
//! Turns an entity list plus a column set into a table view model: header,
//! body and per-row affordances. The renderer never looks inside an entity;
//! it reads identifiers and display names through [`Entity`] and everything
//! else through the [`Columns`] handed to it.
//!
//! ## Body States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Exactly one body state, picked in priority order:                      │
//! │                                                                         │
//! │  1. is_loading ──────────► Loading { skeleton_rows: clamp(size, 3, 8) } │
//! │                                                                         │
//! │  2. data empty ──────────► Empty { colspan: ☐ + columns + actions }     │
//! │                                                                         │
//! │  3. otherwise ───────────► Rows: one per item with an identifier        │
//! │                            ┌───┬──────────┬──────────┬──────────┐       │
//! │                            │ ☐ │ col 1    │ col 2    │ ✎  🗑    │       │
//! │                            ├───┼──────────┼──────────┼──────────┤       │
//! │                            │ ☑ │ ...      │ ...      │ ✎  🗑    │ shaded│
//! │                            └───┴──────────┴──────────┴──────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Actions Column
//! The actions column (header cell included) exists iff at least one of an
//! edit handler, a delete handler, custom actions, `can_edit` or `can_delete`
//! is supplied. `show_actions: Some(false)` hides it regardless. A denied
//! permission renders the control disabled rather than hiding it.
//!
//! Pagination controls are not part of the table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::column::{Cell, Columns};
use crate::entity::{Entity, EntityId};
use crate::list_state::ListState;
use crate::render::RenderContext;
use crate::selection::Selection;
use crate::{MAX_SKELETON_ROWS, MIN_SKELETON_ROWS};

// =============================================================================
// Intents
// =============================================================================

/// A user interaction with the table, consumed by the list controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TableIntent {
    SelectItem(EntityId),
    SelectAll,
    Edit(EntityId),
    Delete(EntityId),
    /// A custom row action, by its key.
    Custom { id: EntityId, action: String },
}

// =============================================================================
// Row Actions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ActionState {
    Enabled,
    /// Visible but not interactive (permission denied or no handler).
    Disabled,
}

impl ActionState {
    fn from_flags(handler: bool, allowed: bool) -> Self {
        if handler && allowed {
            ActionState::Enabled
        } else {
            ActionState::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ActionState::Enabled)
    }
}

/// One custom action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RowAction {
    /// Sent back in [`TableIntent::Custom`].
    pub key: String,
    pub label: String,
    pub state: ActionState,
}

impl RowAction {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        RowAction {
            key: key.into(),
            label: label.into(),
            state: ActionState::Enabled,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.state = ActionState::Disabled;
        self
    }
}

/// Contents of a row's actions cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RowActions {
    /// Edit/delete pair. `None` means the control is not rendered at all.
    Standard {
        edit: Option<ActionState>,
        delete: Option<ActionState>,
    },
    /// Replaces the edit/delete pair entirely.
    Custom(Vec<RowAction>),
}

type CustomActions<T> = Arc<dyn Fn(&T, &RenderContext) -> Vec<RowAction> + Send + Sync>;

/// Which row interactions the page wired up.
pub struct RowHandlers<T> {
    pub edit: bool,
    pub delete: bool,
    custom: Option<CustomActions<T>>,
}

impl<T> RowHandlers<T> {
    /// No handlers.
    pub fn none() -> Self {
        RowHandlers {
            edit: false,
            delete: false,
            custom: None,
        }
    }

    /// Edit and delete both wired.
    pub fn edit_delete() -> Self {
        RowHandlers {
            edit: true,
            delete: true,
            custom: None,
        }
    }

    /// Replaces the edit/delete pair with per-row custom actions.
    pub fn custom<F>(mut self, actions: F) -> Self
    where
        F: Fn(&T, &RenderContext) -> Vec<RowAction> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(actions));
        self
    }

    fn any(&self) -> bool {
        self.edit || self.delete || self.custom.is_some()
    }
}

impl<T> Default for RowHandlers<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> Clone for RowHandlers<T> {
    fn clone(&self) -> Self {
        RowHandlers {
            edit: self.edit,
            delete: self.delete,
            custom: self.custom.clone(),
        }
    }
}

impl<T> std::fmt::Debug for RowHandlers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowHandlers")
            .field("edit", &self.edit)
            .field("delete", &self.delete)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

// =============================================================================
// Props
// =============================================================================

/// Everything the renderer needs for one frame.
pub struct TableProps<'a, T> {
    pub data: &'a [T],
    pub columns: &'a Columns<T>,
    pub selection: &'a Selection,
    pub page: u32,
    pub page_size: u32,
    pub all_checked: bool,
    pub is_loading: bool,
    pub no_data_message: String,
    pub handlers: RowHandlers<T>,
    pub show_actions: Option<bool>,
    /// `None` counts as allowed.
    pub can_edit: Option<bool>,
    /// `None` counts as allowed.
    pub can_delete: Option<bool>,
    pub ctx: &'a RenderContext,
}

impl<'a, T: Entity> TableProps<'a, T> {
    pub fn new(
        data: &'a [T],
        columns: &'a Columns<T>,
        selection: &'a Selection,
        ctx: &'a RenderContext,
    ) -> Self {
        TableProps {
            data,
            columns,
            selection,
            page: 1,
            page_size: crate::DEFAULT_PAGE_SIZE,
            all_checked: false,
            is_loading: false,
            no_data_message: format!("No {} records found", T::KIND.to_lowercase()),
            handlers: RowHandlers::none(),
            show_actions: None,
            can_edit: None,
            can_delete: None,
            ctx,
        }
    }

    /// Props reflecting the current state of a list engine.
    pub fn from_state(state: &'a ListState<T>, columns: &'a Columns<T>, ctx: &'a RenderContext) -> Self {
        TableProps {
            page: state.page(),
            page_size: state.page_size(),
            all_checked: state.all_checked(),
            is_loading: state.is_loading(),
            ..TableProps::new(state.items(), columns, state.selection(), ctx)
        }
    }

    pub fn handlers(mut self, handlers: RowHandlers<T>) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn no_data_message(mut self, message: impl Into<String>) -> Self {
        self.no_data_message = message.into();
        self
    }

    pub fn permissions(mut self, can_edit: Option<bool>, can_delete: Option<bool>) -> Self {
        self.can_edit = can_edit;
        self.can_delete = can_delete;
        self
    }

    pub fn show_actions(mut self, show: bool) -> Self {
        self.show_actions = Some(show);
        self
    }

    /// Whether the actions column is rendered.
    pub fn has_actions_column(&self) -> bool {
        if self.show_actions == Some(false) {
            return false;
        }
        self.handlers.any() || self.can_edit.is_some() || self.can_delete.is_some()
    }
}

// =============================================================================
// View Model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    /// Select-all checkbox state.
    pub all_checked: bool,
    /// Select-all is inert while loading or when there are no rows.
    pub select_all_enabled: bool,
    pub columns: Vec<HeaderCell>,
    pub actions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: EntityId,
    pub display_name: String,
    pub cells: Vec<Cell>,
    pub selected: bool,
    /// Alternating background, by absolute row position.
    pub shaded: bool,
    /// `None` when the table has no actions column.
    pub actions: Option<RowActions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", content = "content", rename_all = "camelCase")]
pub enum TableBody {
    /// Placeholder rows with the same column layout as real rows.
    Loading { skeleton_rows: u32, columns: usize },
    /// One full-width row with a message.
    Empty { colspan: usize, message: String },
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub header: HeaderView,
    pub body: TableBody,
}

impl TableView {
    /// Number of body rows, counting skeleton and empty-state rows.
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Loading { skeleton_rows, .. } => *skeleton_rows as usize,
            TableBody::Empty { .. } => 1,
            TableBody::Rows(rows) => rows.len(),
        }
    }

    /// Cells per row: selection checkbox, data columns, actions.
    pub fn width(&self) -> usize {
        1 + self.header.columns.len() + usize::from(self.header.actions)
    }

    pub fn row(&self, id: &EntityId) -> Option<&RowView> {
        match &self.body {
            TableBody::Rows(rows) => rows.iter().find(|r| &r.id == id),
            _ => None,
        }
    }
}

/// Skeleton rows shown while loading: `clamp(page_size, 3, 8)`.
pub fn skeleton_rows(page_size: u32) -> u32 {
    page_size.clamp(MIN_SKELETON_ROWS, MAX_SKELETON_ROWS)
}

// =============================================================================
// Rendering
// =============================================================================

/// Builds the table view model. Pure.
pub fn render_table<T: Entity>(props: &TableProps<'_, T>) -> TableView {
    let actions = props.has_actions_column();

    let header = HeaderView {
        all_checked: props.all_checked,
        select_all_enabled: !props.is_loading && !props.data.is_empty(),
        columns: props
            .columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key().to_string(),
                label: c.header().to_string(),
                width: c.width_hint().map(str::to_string),
            })
            .collect(),
        actions,
    };
    let width = 1 + props.columns.len() + usize::from(actions);

    let rows = if props.is_loading {
        Vec::new()
    } else {
        render_rows(props, actions)
    };

    // Data made only of malformed records renders like no data at all
    let body = if props.is_loading {
        TableBody::Loading {
            skeleton_rows: skeleton_rows(props.page_size),
            columns: width,
        }
    } else if rows.is_empty() {
        TableBody::Empty {
            colspan: width,
            message: props.no_data_message.clone(),
        }
    } else {
        TableBody::Rows(rows)
    };

    TableView { header, body }
}

fn render_rows<T: Entity>(props: &TableProps<'_, T>, actions: bool) -> Vec<RowView> {
    let offset = (props.page.max(1) as u64 - 1) * props.page_size as u64;

    props
        .data
        .iter()
        .filter_map(|item| item.id().map(|id| (id, item)))
        .enumerate()
        .map(|(index, (id, item))| RowView {
            selected: props.selection.contains(&id),
            display_name: item.display_name(props.ctx),
            cells: props.columns.render_row(item, props.ctx),
            shaded: (offset + index as u64) % 2 == 1,
            actions: actions.then(|| row_actions(props, item)),
            id,
        })
        .collect()
}

fn row_actions<T: Entity>(props: &TableProps<'_, T>, item: &T) -> RowActions {
    if let Some(custom) = &props.handlers.custom {
        return RowActions::Custom(custom(item, props.ctx));
    }

    let handlers = &props.handlers;
    let edit = (handlers.edit || props.can_edit.is_some())
        .then(|| ActionState::from_flags(handlers.edit, props.can_edit.unwrap_or(true)));
    let delete = (handlers.delete || props.can_delete.is_some())
        .then(|| ActionState::from_flags(handlers.delete, props.can_delete.unwrap_or(true)));

    RowActions::Standard { edit, delete }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;
    use crate::types::Region;

    fn columns() -> Columns<Region> {
        Columns::new(vec![
            ColumnDescriptor::new("code", "Code", |r: &Region, _: &RenderContext| {
                Cell::text(r.code.clone())
            })
            .width("15%"),
            ColumnDescriptor::new("name", "Name", |r: &Region, ctx: &RenderContext| {
                Cell::text(r.display_name(ctx))
            }),
        ])
        .unwrap()
    }

    fn regions(n: i64) -> Vec<Region> {
        (1..=n)
            .map(|i| Region::new(i, format!("R{}", i), format!("Region {}", i), format!("منطقة {}", i)))
            .collect()
    }

    #[test]
    fn test_empty_state_spans_every_column() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data: Vec<Region> = Vec::new();

        let props = TableProps::new(&data, &cols, &selection, &ctx)
            .handlers(RowHandlers::edit_delete())
            .no_data_message("No regions");
        let view = render_table(&props);

        assert_eq!(view.row_count(), 1);
        assert_eq!(
            view.body,
            TableBody::Empty {
                colspan: 4,
                message: "No regions".to_string()
            }
        );
        assert!(!view.header.select_all_enabled);
    }

    #[test]
    fn test_empty_state_without_actions() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data: Vec<Region> = Vec::new();

        let view = render_table(&TableProps::new(&data, &cols, &selection, &ctx));
        assert!(matches!(view.body, TableBody::Empty { colspan: 3, .. }));
    }

    #[test]
    fn test_loading_skeleton_is_bounded() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data = regions(2);

        for (page_size, expected) in [(3, 3), (100, 8), (1, 3), (5, 5)] {
            let mut props = TableProps::new(&data, &cols, &selection, &ctx);
            props.is_loading = true;
            props.page_size = page_size;

            let view = render_table(&props);
            assert_eq!(view.row_count(), expected, "page_size {}", page_size);
            assert!(matches!(view.body, TableBody::Loading { columns: 3, .. }));
        }
    }

    #[test]
    fn test_rows_without_id_are_skipped() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let mut data = regions(4);
        data[1].id = None;

        let view = render_table(&TableProps::new(&data, &cols, &selection, &ctx));

        assert_eq!(view.row_count(), data.len() - 1);
        assert!(view.row(&EntityId::Num(2)).is_none());
    }

    #[test]
    fn test_only_malformed_rows_render_empty_state() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let mut data = regions(2);
        for region in &mut data {
            region.id = None;
        }

        let view = render_table(&TableProps::new(&data, &cols, &selection, &ctx));

        assert_eq!(
            view.body,
            TableBody::Empty {
                colspan: 3,
                message: "No region records found".to_string(),
            }
        );
    }

    #[test]
    fn test_rows_render_cells_selection_and_shading() {
        let cols = columns();
        let mut selection = Selection::new();
        selection.toggle(EntityId::Num(7));
        let ctx = RenderContext::rtl("ar");
        let data: Vec<Region> = regions(10).into_iter().skip(5).collect();

        let mut props = TableProps::new(&data, &cols, &selection, &ctx);
        props.page = 2;
        props.page_size = 5;
        let view = render_table(&props);

        let TableBody::Rows(rows) = &view.body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 5);
        // Absolute positions 5..10: odd positions are shaded
        assert!(rows[0].shaded);
        assert!(!rows[1].shaded);
        assert!(rows[1].selected);
        assert_eq!(rows[0].display_name, "منطقة 6");
        assert_eq!(rows[0].cells, vec![Cell::text("R6"), Cell::text("منطقة 6")]);
        assert!(rows[0].actions.is_none());
        assert_eq!(view.header.columns[0].width.as_deref(), Some("15%"));
    }

    #[test]
    fn test_actions_column_presence() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data = regions(1);

        let base = || TableProps::new(&data, &cols, &selection, &ctx);

        assert!(!base().has_actions_column());
        assert!(base().handlers(RowHandlers::edit_delete()).has_actions_column());
        assert!(base().permissions(Some(false), None).has_actions_column());
        assert!(!base()
            .handlers(RowHandlers::edit_delete())
            .show_actions(false)
            .has_actions_column());

        let view = render_table(&base());
        assert!(!view.header.actions);
        assert_eq!(view.width(), 3);
    }

    #[test]
    fn test_denied_permission_disables_instead_of_hiding() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data = regions(1);

        let props = TableProps::new(&data, &cols, &selection, &ctx)
            .handlers(RowHandlers::edit_delete())
            .permissions(Some(false), None);
        let view = render_table(&props);

        let row = view.row(&EntityId::Num(1)).unwrap();
        assert_eq!(
            row.actions,
            Some(RowActions::Standard {
                edit: Some(ActionState::Disabled),
                delete: Some(ActionState::Enabled),
            })
        );
    }

    #[test]
    fn test_delete_only_handler_hides_edit() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data = regions(1);

        let handlers = RowHandlers {
            delete: true,
            ..RowHandlers::none()
        };
        let view = render_table(&TableProps::new(&data, &cols, &selection, &ctx).handlers(handlers));

        let row = view.row(&EntityId::Num(1)).unwrap();
        assert_eq!(
            row.actions,
            Some(RowActions::Standard {
                edit: None,
                delete: Some(ActionState::Enabled),
            })
        );
    }

    #[test]
    fn test_custom_actions_replace_standard_pair() {
        let cols = columns();
        let selection = Selection::new();
        let ctx = RenderContext::default();
        let data = regions(2);

        let handlers = RowHandlers::edit_delete().custom(|r: &Region, _: &RenderContext| {
            let sync = RowAction::new("sync", "Sync");
            if r.id == Some(2) {
                vec![sync.disabled()]
            } else {
                vec![sync]
            }
        });
        let view = render_table(&TableProps::new(&data, &cols, &selection, &ctx).handlers(handlers));

        let row = view.row(&EntityId::Num(2)).unwrap();
        assert_eq!(
            row.actions,
            Some(RowActions::Custom(vec![RowAction::new("sync", "Sync").disabled()]))
        );
    }

    #[test]
    fn test_intent_wire_format() {
        let intent = TableIntent::Custom {
            id: EntityId::Num(3),
            action: "sync".to_string(),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["payload"]["id"], 3);

        let back: TableIntent = serde_json::from_str(r#"{"type":"selectAll"}"#).unwrap();
        assert_eq!(back, TableIntent::SelectAll);
    }
}
