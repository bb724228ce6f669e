//! # Data Sources
//!
//! The data-access seam the list controller is generic over. Every HR module
//! talks to the same shape of REST resource, so one trait covers them all;
//! [`HttpSource`](crate::http::HttpSource) implements it against the backend
//! and [`InMemorySource`](crate::memory::InMemorySource) in memory.
//!
//! Implementations normalize whatever envelope the backend sends before
//! returning: the controller only ever sees [`PageResponse`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use workforce_core::{Entity, EntityId, ListQuery, PageResponse};

use crate::error::ClientResult;

/// Acknowledgement of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    /// Rows removed, when the backend reports it.
    pub affected: Option<u64>,
}

impl DeleteAck {
    pub fn affected(count: u64) -> Self {
        DeleteAck {
            affected: Some(count),
        }
    }
}

/// CRUD access to one entity collection.
#[async_trait]
pub trait DataSource<T: Entity>: Send + Sync {
    /// Fetches one page.
    async fn list(&self, query: &ListQuery) -> ClientResult<PageResponse<T>>;

    /// Creates an entity and returns it as stored (with its identifier).
    async fn create(&self, entity: &T) -> ClientResult<T>;

    /// Replaces the entity with this identifier and returns it as stored.
    async fn update(&self, id: &EntityId, entity: &T) -> ClientResult<T>;

    async fn delete(&self, id: &EntityId) -> ClientResult<DeleteAck>;

    /// Deletes several entities in one call.
    async fn delete_many(&self, ids: &[EntityId]) -> ClientResult<DeleteAck>;
}
