//! Shared state of the probe HTTP surface
//!
//! `ProbeHost` is what every resource handler sees: the data provider and
//! the request defaults. It holds no transport details, so the same host can
//! back the axum router and direct calls from tests.

use crate::core::provider::DataProvider;
use crate::core::query::DEFAULT_PAGE_SIZE;
use std::sync::Arc;

/// Host context shared by all probe resources
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ProbeHost::new(Arc::new(SnapshotProvider::open("export.zip")?)));
/// let app = build_probe_routes(host, "/probe-client-adapter/weld-probe");
/// ```
#[derive(Clone)]
pub struct ProbeHost {
    /// Backend answering the resources
    pub provider: Arc<dyn DataProvider>,

    /// Page size used when a request does not carry `pageSize`
    pub default_page_size: usize,
}

impl ProbeHost {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self {
            provider,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }
}

impl std::fmt::Debug for ProbeHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeHost")
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}
