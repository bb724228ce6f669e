//! # Notifications
//!
//! Toast-style outcome messages for mutations. The controller emits one
//! notification per create/update/delete; what happens to it (a toast in the
//! dashboard, a log line in the CLI, a vector in tests) is up to the sink.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    /// A mutation was refused with HTTP 409.
    Conflict,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[ts(as = "String")]
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    /// Error or conflict notification for a failed operation.
    pub fn failure(action: &str, err: &ClientError) -> Self {
        let kind = if err.is_conflict() {
            NotificationKind::Conflict
        } else {
            NotificationKind::Error
        };
        Self::new(kind, format!("Failed to {}: {}", action, err.user_message()))
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives notifications (implemented by the UI integration).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Discards everything.
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&self, _notification: Notification) {}
}

/// Logs notifications through `tracing`.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        match n.kind {
            NotificationKind::Success | NotificationKind::Info => {
                info!(id = %n.id, message = %n.message, "Notification")
            }
            NotificationKind::Conflict => warn!(id = %n.id, message = %n.message, "Conflict"),
            NotificationKind::Error => error!(id = %n.id, message = %n.message, "Error"),
        }
    }
}

/// Collects notifications in memory.
#[derive(Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
