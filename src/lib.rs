//! # Probe Adapter
//!
//! Diagnostic bridge for the Weld Probe: serves introspection data about a
//! CDI container (beans, observer methods, contexts, fired events, invocation
//! trees) over the `/weld-probe` HTTP resources, from either an exported
//! archive or a live remote probe.
//!
//! ## Features
//!
//! - **Filtering and Paging**: `key:value` filter expressions per record kind,
//!   stable paging with `{ page, lastPage, total, data }` envelopes
//! - **Snapshot Backend**: read-only provider over an exported zip archive
//! - **Live Backend**: forwards every operation to a running probe (feature `remote`)
//! - **Resource Dispatcher**: ordered resource table with verb and protocol checks
//! - **Configuration-Based**: YAML configuration, overridable from the CLI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use probe::prelude::*;
//!
//! let provider = SnapshotProvider::open("weld-probe-export.zip")?;
//! ServerBuilder::new()
//!     .with_provider(provider)
//!     .with_context_path("/probe-client-adapter")
//!     .serve("127.0.0.1:8181")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DataProvider, Page, ProbeError, ProbeResult, QueryParams, Record,
        filter::{
            BeanFilters, DeploymentModules, EventFilters, Filters, InvocationFilters,
            ObserverFilters, init_filters, parse_filters,
        },
        paginate,
    };

    // === Storage ===
    #[cfg(feature = "remote")]
    pub use crate::storage::RemoteProvider;
    pub use crate::storage::{SnapshotProvider, open_provider};

    // === Config ===
    pub use crate::config::{AdapterConfig, DataSource, SourceConfig};

    // === Server ===
    pub use crate::server::{ProbeHost, ProbeServer, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;

    // === Axum ===
    pub use axum::Router;
}
