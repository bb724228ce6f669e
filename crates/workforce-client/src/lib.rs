//! # workforce-client: Async List Controller for the Workforce Dashboard
//!
//! Drives the pure list engine from `workforce-core` against the HR backend.
//! One [`ListController`] backs one list screen; the page composes it with a
//! column set and renders the resulting table view.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Layer Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                ListController<T, S> (per screen)                 │  │
//! │  │                                                                  │  │
//! │  │  Owns ListState<T> behind a tokio RwLock                         │  │
//! │  │  Runs fetch tickets, debounces search, reconciles mutations      │  │
//! │  └──────────────┬──────────────────────────────────┬────────────────┘  │
//! │                 │                                  │                    │
//! │                 ▼                                  ▼                    │
//! │  ┌────────────────────────────┐      ┌────────────────────────────┐    │
//! │  │   DataSource<T> (trait)    │      │  NotificationSink (trait)  │    │
//! │  │                            │      │                            │    │
//! │  │  HttpSource    reqwest +   │      │  TracingSink   log lines   │    │
//! │  │                envelope    │      │  MemorySink    tests       │    │
//! │  │  InMemorySource  tests     │      │  (UI toast adapter)        │    │
//! │  └────────────────────────────┘      └────────────────────────────┘    │
//! │                                                                         │
//! │  ClientConfig: defaults → client.toml → WORKFORCE_* environment         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`controller`] - `ListController`, the async driver of one list screen
//! - [`source`] - The `DataSource` trait
//! - [`http`] - REST implementation of `DataSource`
//! - [`envelope`] - Response envelope normalization
//! - [`memory`] - In-memory `DataSource` for tests and demos
//! - [`notify`] - Mutation outcome notifications
//! - [`config`] - Client configuration (TOML + environment)
//! - [`error`] - Client error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use workforce_client::{ClientConfig, HttpSource, ListController, TracingSink};
//! use workforce_core::catalog::region_columns;
//! use workforce_core::table::RowHandlers;
//! use workforce_core::types::Region;
//!
//! let config = ClientConfig::load_or_default(None);
//! let source: HttpSource<Region> = HttpSource::new(&config.api, "regions")?;
//! let regions = ListController::from_config(source, &config, Arc::new(TracingSink));
//!
//! regions.load().await;
//! regions.set_search("north").await;
//!
//! let view = regions
//!     .render(&region_columns()?, &config.render_context(), RowHandlers::edit_delete())
//!     .await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod http;
pub mod memory;
pub mod notify;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, ClientConfig, ListSettings, LocaleSettings};
pub use controller::ListController;
pub use error::{ClientError, ClientResult};
pub use http::HttpSource;
pub use memory::InMemorySource;
pub use notify::{MemorySink, NoOpSink, Notification, NotificationKind, NotificationSink, TracingSink};
pub use source::{DataSource, DeleteAck};
