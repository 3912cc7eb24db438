//! Server module exposing the probe resources over HTTP
//!
//! This module provides:
//! - The resource table and the dispatcher in front of it
//! - A `ServerBuilder` producing the axum router
//! - `ProbeServer`, a restartable background listener

pub mod builder;
pub mod dispatch;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod resource;
pub mod router;

pub use builder::{ProbeServer, ServerBuilder, shutdown_signal};
pub use host::ProbeHost;
pub use resource::{HttpMethod, PROBE_PREFIX, RESOURCES, Resource};
