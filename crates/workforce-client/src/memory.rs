//! # In-Memory Data Source
//!
//! A [`DataSource`] backed by a vector, used by tests and demos. It behaves
//! like the REST backend where that matters to the list controller: paging,
//! search, optional totals, conflicts on duplicate names, latency and
//! injected failures.
//!
//! New rows are inserted at the front, matching the backend's newest-first
//! ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use workforce_core::{Entity, EntityId, ListQuery, PageResponse, RenderContext};

use crate::error::{ClientError, ClientResult};
use crate::source::{DataSource, DeleteAck};

type IdAssigner<T> = Arc<dyn Fn(&mut T, i64) + Send + Sync>;
type FilterFn<T> = Arc<dyn Fn(&T, &BTreeMap<String, String>) -> bool + Send + Sync>;
type LatencyFn = Arc<dyn Fn(&ListQuery) -> Duration + Send + Sync>;

pub struct InMemorySource<T> {
    rows: RwLock<Vec<T>>,
    report_totals: bool,
    assign_id: Option<IdAssigner<T>>,
    filter: Option<FilterFn<T>>,
    latency: Option<LatencyFn>,
    /// Rows the backend refuses to delete (still referenced elsewhere).
    protected: BTreeSet<EntityId>,
    calls: AtomicUsize,
    list_calls: AtomicUsize,
    /// Status code the next call fails with.
    fail_next: Mutex<Option<u16>>,
}

impl<T: Entity> InMemorySource<T> {
    pub fn new(rows: Vec<T>) -> Self {
        InMemorySource {
            rows: RwLock::new(rows),
            report_totals: true,
            assign_id: None,
            filter: None,
            latency: None,
            protected: BTreeSet::new(),
            calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
        }
    }

    /// Whether list responses carry a total. Without one, callers only see
    /// `has_next`.
    pub fn with_totals(mut self, report: bool) -> Self {
        self.report_totals = report;
        self
    }

    /// Hook that writes a fresh numeric id into a created entity.
    pub fn with_id_assigner<F>(mut self, assign: F) -> Self
    where
        F: Fn(&mut T, i64) + Send + Sync + 'static,
    {
        self.assign_id = Some(Arc::new(assign));
        self
    }

    /// Interprets `ListQuery::filters` for this entity type.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&T, &BTreeMap<String, String>) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Constant delay before every list response.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.with_latency_fn(move |_| latency)
    }

    /// Per-query delay before list responses.
    pub fn with_latency_fn<F>(mut self, latency: F) -> Self
    where
        F: Fn(&ListQuery) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Arc::new(latency));
        self
    }

    /// Rows that single deletes reject with 409 and bulk deletes skip.
    pub fn with_protected(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.protected.extend(ids);
        self
    }

    /// Makes the next call fail with this HTTP status.
    pub fn fail_next(&self, status: u16) {
        if let Ok(mut next) = self.fail_next.lock() {
            *next = Some(status);
        }
    }

    /// Calls of any kind so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Current contents, newest first.
    pub async fn rows(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    fn enter(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self.fail_next.lock().ok().and_then(|mut next| next.take());
        match injected {
            Some(status) => Err(ClientError::from_status(status, "injected failure")),
            None => Ok(()),
        }
    }

    fn conflicts(rows: &[T], entity: &T, except: Option<&EntityId>) -> bool {
        let ctx = RenderContext::default();
        let name = entity.display_name(&ctx).trim().to_lowercase();
        rows.iter()
            .filter(|row| except.is_none() || row.id().as_ref() != except)
            .any(|row| row.display_name(&ctx).trim().to_lowercase() == name)
    }
}

fn not_found(id: &EntityId, kind: &str) -> ClientError {
    ClientError::Status {
        status: 404,
        message: format!("{} {} not found", kind, id),
    }
}

#[async_trait]
impl<T: Entity> DataSource<T> for InMemorySource<T> {
    async fn list(&self, query: &ListQuery) -> ClientResult<PageResponse<T>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.enter()?;

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(query)).await;
        }

        let rows = self.rows.read().await;
        let matching: Vec<&T> = rows
            .iter()
            .filter(|row| row.matches_search(&query.search))
            .filter(|row| match &self.filter {
                Some(filter) => filter(*row, &query.filters),
                None => true,
            })
            .collect();

        let offset = query.offset().min(matching.len() as u64) as usize;
        let data: Vec<T> = matching
            .iter()
            .skip(offset)
            .take(query.page_size as usize)
            .map(|row| (*row).clone())
            .collect();

        let total = matching.len() as u64;
        let has_next = (offset + data.len()) < matching.len();
        debug!(page = query.page, rows = data.len(), total, "In-memory list");

        Ok(PageResponse::new(data, self.report_totals.then_some(total), has_next))
    }

    async fn create(&self, entity: &T) -> ClientResult<T> {
        self.enter()?;
        let mut rows = self.rows.write().await;

        if Self::conflicts(&rows, entity, None) {
            return Err(ClientError::Conflict {
                message: format!("{} with this name already exists", T::KIND),
            });
        }

        let mut stored = entity.clone();
        if let Some(assign) = &self.assign_id {
            let next = rows
                .iter()
                .filter_map(|row| match row.id() {
                    Some(EntityId::Num(n)) => Some(n),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
                + 1;
            assign(&mut stored, next);
        }

        let Some(id) = stored.id() else {
            return Err(ClientError::Status {
                status: 422,
                message: format!("{} has no identifier", T::KIND),
            });
        };
        if rows.iter().any(|row| row.id().as_ref() == Some(&id)) {
            return Err(ClientError::Conflict {
                message: format!("{} {} already exists", T::KIND, id),
            });
        }

        rows.insert(0, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &EntityId, entity: &T) -> ClientResult<T> {
        self.enter()?;
        let mut rows = self.rows.write().await;

        if Self::conflicts(&rows, entity, Some(id)) {
            return Err(ClientError::Conflict {
                message: format!("{} with this name already exists", T::KIND),
            });
        }

        let slot = rows
            .iter_mut()
            .find(|row| row.id().as_ref() == Some(id))
            .ok_or_else(|| not_found(id, T::KIND))?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn delete(&self, id: &EntityId) -> ClientResult<DeleteAck> {
        self.enter()?;
        if self.protected.contains(id) {
            return Err(ClientError::Conflict {
                message: format!("{} {} is still in use", T::KIND, id),
            });
        }
        let mut rows = self.rows.write().await;

        let before = rows.len();
        rows.retain(|row| row.id().as_ref() != Some(id));
        if rows.len() == before {
            return Err(not_found(id, T::KIND));
        }
        Ok(DeleteAck::affected(1))
    }

    async fn delete_many(&self, ids: &[EntityId]) -> ClientResult<DeleteAck> {
        self.enter()?;
        let mut rows = self.rows.write().await;

        let before = rows.len();
        rows.retain(|row| {
            row.id()
                .map_or(true, |id| !ids.contains(&id) || self.protected.contains(&id))
        });
        Ok(DeleteAck::affected((before - rows.len()) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::types::Region;

    fn source(n: i64) -> InMemorySource<Region> {
        let rows = (1..=n)
            .map(|i| Region::new(i, format!("R{}", i), format!("Region {}", i), ""))
            .collect();
        InMemorySource::new(rows).with_id_assigner(|r: &mut Region, id| r.id = Some(id))
    }

    #[tokio::test]
    async fn test_list_pages_and_totals() {
        let source = source(12);

        let page = source.list(&ListQuery::new(3, 5)).await.unwrap();
        assert_eq!(page.data.iter().filter_map(|r| r.id).collect::<Vec<_>>(), vec![11, 12]);
        assert_eq!(page.total, Some(12));
        assert!(!page.has_next);

        let source = source.with_totals(false);
        let page = source.list(&ListQuery::new(1, 5)).await.unwrap();
        assert_eq!(page.total, None);
        assert!(page.has_next);
        assert_eq!(source.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_search_and_filter() {
        let source = source(12).with_filter(|r: &Region, filters| {
            filters.get("code").map_or(true, |c| &r.code == c)
        });

        let page = source
            .list(&ListQuery::new(1, 10).with_search("region 1"))
            .await
            .unwrap();
        assert_eq!(page.total, Some(4));

        let page = source
            .list(&ListQuery::new(1, 10).with_filter("code", "R7"))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_detects_conflict() {
        let source = source(3);

        let created = source
            .create(&Region::new(0, "N", "North", "الشمال"))
            .await
            .unwrap();
        assert_eq!(created.id, Some(4));
        assert_eq!(source.rows().await[0].id, Some(4));

        let err = source
            .create(&Region::new(0, "N2", "north ", ""))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let source = source(3);

        let renamed = Region::new(2, "R2", "Renamed", "");
        source.update(&EntityId::Num(2), &renamed).await.unwrap();
        // Keeping its own name is not a conflict
        source.update(&EntityId::Num(2), &renamed).await.unwrap();

        let clash = Region::new(2, "R2", "Region 3", "");
        assert!(source.update(&EntityId::Num(2), &clash).await.unwrap_err().is_conflict());

        assert_eq!(source.delete(&EntityId::Num(2)).await.unwrap(), DeleteAck::affected(1));
        assert!(matches!(
            source.delete(&EntityId::Num(2)).await,
            Err(ClientError::Status { status: 404, .. })
        ));

        let ack = source
            .delete_many(&[EntityId::Num(1), EntityId::Num(3), EntityId::Num(99)])
            .await
            .unwrap();
        assert_eq!(ack, DeleteAck::affected(2));
        assert!(source.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_protected_rows_survive_deletes() {
        let source = source(3).with_protected([EntityId::Num(2)]);

        assert!(source.delete(&EntityId::Num(2)).await.unwrap_err().is_conflict());

        let ack = source
            .delete_many(&[EntityId::Num(1), EntityId::Num(2), EntityId::Num(3)])
            .await
            .unwrap();
        assert_eq!(ack, DeleteAck::affected(1));
        assert_eq!(source.rows().await.iter().filter_map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let source = source(3);
        source.fail_next(500);

        assert!(source.list(&ListQuery::new(1, 5)).await.is_err());
        assert!(source.list(&ListQuery::new(1, 5)).await.is_ok());
        assert_eq!(source.calls(), 2);
    }
}
