//! Router builder utilities for probe routes

use super::dispatch::{dispatch_path, dispatch_root};
use super::host::ProbeHost;
use axum::{Router, routing::any};
use std::sync::Arc;

/// Build the probe routes below `prefix` (e.g. `/probe-client-adapter/weld-probe`)
///
/// Every verb reaches the dispatcher, which answers unknown ones itself:
/// - ANY {prefix} - Client page
/// - ANY {prefix}/{*path} - Resource table lookup
pub fn build_probe_routes(host: Arc<ProbeHost>, prefix: &str) -> Router {
    Router::new()
        .route(prefix, any(dispatch_root))
        .route(&format!("{}/", prefix), any(dispatch_root))
        .route(&format!("{}/{{*path}}", prefix), any(dispatch_path))
        .with_state(host)
}
