//! Data provider contract shared by every backend

use crate::core::error::ProbeResult;
use async_trait::async_trait;

/// Source of probe JSON documents
///
/// Implementations differ only in where the data comes from (an exported
/// archive, a live remote probe); the JSON they return has the same shape.
/// Every operation returns JSON text. Lookups by identifier fail with
/// [`ProbeError::NotFound`](crate::core::error::ProbeError::NotFound),
/// operations a backend cannot perform fail with
/// [`ProbeError::Unsupported`](crate::core::error::ProbeError::Unsupported).
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Deployment document (bean deployment archives, configuration)
    async fn receive_deployment(&self) -> ProbeResult<String>;

    /// One page of beans; `representation` is accepted but has no effect yet
    async fn receive_beans(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
        representation: Option<&str>,
    ) -> ProbeResult<String>;

    /// Bean detail
    ///
    /// Unless the matching flag is set, each direct entry of `dependencies` /
    /// `dependents` comes back without its own nested array.
    async fn receive_bean(
        &self,
        id: &str,
        transient_dependencies: bool,
        transient_dependents: bool,
    ) -> ProbeResult<String>;

    /// Contextual instance of a bean
    async fn receive_bean_instance(&self, id: &str) -> ProbeResult<String>;

    /// One page of observer methods
    async fn receive_observers(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String>;

    async fn receive_observer(&self, id: &str) -> ProbeResult<String>;

    /// Lifecycle context descriptors
    async fn receive_contexts(&self) -> ProbeResult<String>;

    /// Context detail, `{}` for an unknown id
    async fn receive_context(&self, id: &str) -> ProbeResult<String>;

    /// One page of invocation trees
    async fn receive_invocations(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String>;

    async fn receive_invocation(&self, id: &str) -> ProbeResult<String>;

    /// Drop the recorded invocation history
    async fn clear_invocations(&self) -> ProbeResult<String>;

    /// One page of fired events
    async fn receive_events(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String>;

    async fn receive_event(&self, id: &str) -> ProbeResult<String>;

    /// Drop the recorded event history
    async fn clear_events(&self) -> ProbeResult<String>;

    /// `{ firedEventCount, invocationCount }`
    async fn receive_monitoring_stats(&self) -> ProbeResult<String>;

    /// Beans available for injection
    async fn receive_available_beans(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
        representation: Option<&str>,
    ) -> ProbeResult<String>;
}
