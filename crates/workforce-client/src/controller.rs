//! # List Controller
//!
//! The async half of a list screen. It owns a [`ListState`] behind a tokio
//! `RwLock`, runs the fetch tickets the state hands out against a
//! [`DataSource`], debounces search input, and applies confirmed mutations
//! to the cache.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ListController<T, S>                             │
//! │                                                                         │
//! │   set_search("nor") ──► state.type_search()  (shown immediately)        │
//! │        │                                                                │
//! │        └─► spawn: sleep(debounce) ──► state.apply_search() ─┐           │
//! │            (skipped if a newer keystroke arrived meanwhile) │           │
//! │                                                             ▼           │
//! │   set_page(3) ───────► state.request_page(3) ──────────► ticket         │
//! │                                                             │           │
//! │                           source.list(ticket.query) ◄───────┘           │
//! │                                   │   (no lock held while waiting)      │
//! │                                   ▼                                     │
//! │                    state.complete_fetch(ticket, result)                 │
//! │                    → Applied | Superseded | Stale                       │
//! │                                                                         │
//! │   create / update / delete ──► source ──► on success: patch cache,      │
//! │                                           notify Success                │
//! │                                       ──► on failure: cache untouched,  │
//! │                                           notify Error / Conflict       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetch failures end up in the snapshot's `error` field. Nothing is retried
//! automatically; `refetch()` is the recovery path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use workforce_core::table::RowHandlers;
use workforce_core::{
    render_table, Columns, CoreError, Entity, EntityId, FetchOutcome, FetchTicket, ListSnapshot,
    ListState, PageRequest, RenderContext, TableIntent, TableProps, TableView,
    DEFAULT_SEARCH_DEBOUNCE_MS,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::notify::{NoOpSink, Notification, NotificationSink};
use crate::source::{DataSource, DeleteAck};

struct Inner<T, S> {
    state: RwLock<ListState<T>>,
    source: S,
    sink: Arc<dyn NotificationSink>,
    debounce: Duration,
    /// Bumped on every keystroke; a debounce timer only fires if it still
    /// holds the latest value when it wakes.
    keystrokes: AtomicU64,
}

/// Shared handle to one list screen's state. Cloning is cheap.
pub struct ListController<T, S> {
    inner: Arc<Inner<T, S>>,
}

impl<T, S> Clone for ListController<T, S> {
    fn clone(&self) -> Self {
        ListController {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, S> ListController<T, S>
where
    T: Entity,
    S: DataSource<T> + 'static,
{
    pub fn new(source: S, page_size: u32) -> Self {
        Self::build(
            source,
            page_size,
            Arc::new(NoOpSink),
            Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        )
    }

    /// Page size and debounce window from the client configuration.
    pub fn from_config(source: S, config: &ClientConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self::build(source, config.list.page_size, sink, config.search_debounce())
    }

    fn build(source: S, page_size: u32, sink: Arc<dyn NotificationSink>, debounce: Duration) -> Self {
        ListController {
            inner: Arc::new(Inner {
                state: RwLock::new(ListState::new(page_size)),
                source,
                sink,
                debounce,
                keystrokes: AtomicU64::new(0),
            }),
        }
    }

    /// Replaces the notification sink. Only valid before the handle is cloned.
    pub fn with_sink(self, sink: Arc<dyn NotificationSink>) -> Self {
        self.rebuild(|inner| inner.sink = sink)
    }

    /// Replaces the search debounce window. Only valid before the handle is cloned.
    pub fn with_debounce(self, debounce: Duration) -> Self {
        self.rebuild(|inner| inner.debounce = debounce)
    }

    fn rebuild(self, edit: impl FnOnce(&mut Inner<T, S>)) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                edit(&mut inner);
                ListController {
                    inner: Arc::new(inner),
                }
            }
            Err(shared) => {
                warn!(kind = T::KIND, "Controller already shared; builder setting ignored");
                ListController { inner: shared }
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetches page 1 of the current query.
    pub async fn load(&self) -> FetchOutcome {
        let ticket = self.inner.state.write().await.begin_load();
        self.run(ticket).await
    }

    /// Re-fetches the current page, dropping every cached chunk.
    pub async fn refetch(&self) -> FetchOutcome {
        let ticket = self.inner.state.write().await.refetch();
        self.run(ticket).await
    }

    async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        debug!(
            kind = T::KIND,
            page = ticket.page(),
            generation = ticket.generation(),
            "Fetching page"
        );

        let result = self
            .inner
            .source
            .list(&ticket.query)
            .await
            .map_err(|e| {
                warn!(kind = T::KIND, page = ticket.page(), error = %e, "Fetch failed");
                e.user_message()
            });

        let outcome = self.inner.state.write().await.complete_fetch(&ticket, result);
        match outcome {
            FetchOutcome::Applied => debug!(kind = T::KIND, page = ticket.page(), "Page applied"),
            FetchOutcome::Superseded => {
                debug!(kind = T::KIND, page = ticket.page(), "Page cached, no longer current")
            }
            FetchOutcome::Stale => warn!(
                kind = T::KIND,
                page = ticket.page(),
                generation = ticket.generation(),
                "Discarding stale response"
            ),
        }
        outcome
    }

    async fn run_opt(&self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.run(ticket).await;
        }
    }

    // =========================================================================
    // Query Changes
    // =========================================================================

    /// Updates the search box now and fetches once typing settles.
    ///
    /// Only the last value within the debounce window reaches the backend.
    /// A fetch that already started is never cancelled: it completes and the
    /// generation check decides whether its response is kept.
    pub async fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.write().await.type_search(text.clone());
        let keystroke = self.inner.keystrokes.fetch_add(1, Ordering::SeqCst) + 1;

        let this = self.clone();
        let debounce = self.inner.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if this.inner.keystrokes.load(Ordering::SeqCst) != keystroke {
                debug!(kind = T::KIND, "Search superseded by a newer keystroke");
                return;
            }
            this.apply_search(&text).await;
        });
    }

    /// Sends a search immediately, skipping the debounce window.
    pub async fn apply_search(&self, text: &str) {
        let ticket = self.inner.state.write().await.apply_search(text);
        match ticket {
            Ok(ticket) => self.run_opt(ticket).await,
            Err(e) => {
                let err = ClientError::from(e);
                warn!(kind = T::KIND, error = %err, "Search rejected");
                self.inner.sink.notify(Notification::failure("search", &err));
            }
        }
    }

    /// Moves to page `n`, fetching it when it is not cached. Out-of-range
    /// requests are ignored.
    pub async fn set_page(&self, n: u32) -> PageRequest {
        let request = self.inner.state.write().await.request_page(n);
        match &request {
            PageRequest::Ignored => debug!(kind = T::KIND, page = n, "Page out of range, ignored"),
            PageRequest::Ready => debug!(kind = T::KIND, page = n, "Page served from cache"),
            PageRequest::Fetch(ticket) => {
                self.run(ticket.clone()).await;
            }
        }
        request
    }

    /// Moves to page `n` one page at a time, so a source without totals can
    /// reveal the pages in between. Stops at the first page that is out of
    /// range or fails to load.
    pub async fn seek_page(&self, n: u32) -> PageRequest {
        let start = self.inner.state.read().await.page();
        if n <= start {
            return self.set_page(n).await;
        }

        let mut last = PageRequest::Ready;
        for page in start + 1..=n {
            last = self.set_page(page).await;
            let state = self.inner.state.read().await;
            if last == PageRequest::Ignored || state.error().is_some() || state.page() != page {
                debug!(kind = T::KIND, target = n, reached = state.page(), "Seek stopped early");
                return PageRequest::Ignored;
            }
        }
        last
    }

    /// Changes the page size; resets to page 1 and fetches immediately.
    pub async fn set_page_size(&self, page_size: u32) -> ClientResult<()> {
        let ticket = self.inner.state.write().await.set_page_size(page_size)?;
        self.run_opt(ticket).await;
        Ok(())
    }

    pub async fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        let ticket = self.inner.state.write().await.set_filter(key, value);
        self.run_opt(ticket).await;
    }

    pub async fn clear_filter(&self, key: &str) {
        let ticket = self.inner.state.write().await.clear_filter(key);
        self.run_opt(ticket).await;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles one row. Returns false for identifiers never loaded.
    pub async fn select_item(&self, id: EntityId) -> bool {
        self.inner.state.write().await.select_item(id)
    }

    pub async fn select_all(&self) {
        self.inner.state.write().await.select_all();
    }

    pub async fn clear_selection(&self) {
        self.inner.state.write().await.clear_selection();
    }

    /// Handles a table interaction.
    ///
    /// Selection and delete intents are handled here. Edit and custom intents
    /// need page-level UI (a form, a dialog) and are handed back.
    pub async fn dispatch(&self, intent: TableIntent) -> Option<TableIntent> {
        match intent {
            TableIntent::SelectItem(id) => {
                self.select_item(id).await;
                None
            }
            TableIntent::SelectAll => {
                self.select_all().await;
                None
            }
            TableIntent::Delete(id) => {
                // Failures are already reported through the sink
                let _ = self.delete(id).await;
                None
            }
            other @ (TableIntent::Edit(_) | TableIntent::Custom { .. }) => Some(other),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates an entity and prepends it to the first page.
    pub async fn create(&self, entity: T) -> ClientResult<T> {
        match self.inner.source.create(&entity).await {
            Ok(created) => {
                info!(kind = T::KIND, id = ?created.id(), "Created");
                self.inner.state.write().await.apply_created(created.clone());
                self.inner
                    .sink
                    .notify(Notification::success(format!("{} created", T::KIND)));
                Ok(created)
            }
            Err(e) => Err(self.report("create", e)),
        }
    }

    /// Updates an entity and patches every cached copy of it.
    pub async fn update(&self, entity: T) -> ClientResult<T> {
        let id = entity.id().ok_or_else(|| CoreError::MissingIdentifier {
            kind: T::KIND.to_string(),
        })?;

        match self.inner.source.update(&id, &entity).await {
            Ok(updated) => {
                let patched = self.inner.state.write().await.apply_updated(&updated);
                info!(kind = T::KIND, %id, patched, "Updated");
                self.inner
                    .sink
                    .notify(Notification::success(format!("{} updated", T::KIND)));
                Ok(updated)
            }
            Err(e) => Err(self.report("update", e)),
        }
    }

    /// Deletes one entity and removes it from the cache and the selection.
    pub async fn delete(&self, id: EntityId) -> ClientResult<DeleteAck> {
        match self.inner.source.delete(&id).await {
            Ok(ack) => {
                info!(kind = T::KIND, %id, "Deleted");
                let follow_up = self.inner.state.write().await.apply_deleted(&id);
                self.inner
                    .sink
                    .notify(Notification::success(format!("{} deleted", T::KIND)));
                self.run_opt(follow_up).await;
                Ok(ack)
            }
            Err(e) => Err(self.report("delete", e)),
        }
    }

    /// Deletes every selected entity in one call.
    ///
    /// When the backend reports fewer deletions than requested, the cache is
    /// not patched: the requested ids leave the selection and the current
    /// page is re-read.
    pub async fn delete_selected(&self) -> ClientResult<DeleteAck> {
        let ids = self.inner.state.read().await.selection().to_vec();
        if ids.is_empty() {
            self.inner
                .sink
                .notify(Notification::info("No records selected"));
            return Ok(DeleteAck::default());
        }

        match self.inner.source.delete_many(&ids).await {
            Ok(ack) => {
                let requested = ids.len() as u64;
                let count = ack.affected.unwrap_or(requested);

                let follow_up = {
                    let mut state = self.inner.state.write().await;
                    if count < requested {
                        warn!(
                            kind = T::KIND,
                            requested,
                            deleted = count,
                            "Partial bulk delete, re-reading page"
                        );
                        state.deselect(&ids);
                        Some(state.refetch())
                    } else {
                        info!(kind = T::KIND, requested, deleted = count, "Bulk deleted");
                        ids.iter().fold(None, |last, id| state.apply_deleted(id).or(last))
                    }
                };

                let message = if count < requested {
                    format!(
                        "Deleted {} of {} {} record(s)",
                        count,
                        requested,
                        T::KIND.to_lowercase()
                    )
                } else {
                    format!("Deleted {} {} record(s)", count, T::KIND.to_lowercase())
                };
                self.inner.sink.notify(Notification::success(message));
                self.run_opt(follow_up).await;
                Ok(ack)
            }
            Err(e) => Err(self.report("delete selected records", e)),
        }
    }

    fn report(&self, action: &str, err: ClientError) -> ClientError {
        if err.is_conflict() {
            warn!(kind = T::KIND, action, error = %err, "Mutation conflict");
        } else {
            warn!(kind = T::KIND, action, error = %err, "Mutation failed");
        }
        let action = format!("{} {}", action, T::KIND.to_lowercase());
        self.inner.sink.notify(Notification::failure(&action, &err));
        err
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        self.inner.state.read().await.snapshot()
    }

    /// Renders the current state as a table view model.
    pub async fn render(
        &self,
        columns: &Columns<T>,
        ctx: &RenderContext,
        handlers: RowHandlers<T>,
    ) -> TableView {
        let state = self.inner.state.read().await;
        render_table(&TableProps::from_state(&*state, columns, ctx).handlers(handlers))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
