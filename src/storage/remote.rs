//! Live backend forwarding the provider contract to a running probe
//!
//! The remote probe exposes the same `/weld-probe` resources this crate
//! serves, so every operation maps onto one HTTP request.

use crate::core::error::{ProbeError, ProbeResult};
use crate::core::provider::DataProvider;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use std::time::Duration;

/// Request timeout applied when none is configured
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider backed by a live probe REST endpoint
///
/// # Example
/// ```no_run
/// # fn main() -> probe::core::ProbeResult<()> {
/// use probe::storage::RemoteProvider;
/// let provider = RemoteProvider::new("http://localhost:8080/app/weld-probe")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: Client,
    base_url: Url,
}

impl RemoteProvider {
    /// Create a provider with the default timeout
    pub fn new(base_url: &str) -> ProbeResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REMOTE_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ProbeResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ProbeError::BadRequest {
            message: format!("invalid remote URL '{}': {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProbeError::BadRequest {
                message: format!("remote URL '{}' cannot carry a path", base_url),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Remote {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> ProbeResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProbeError::Internal(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and map the response status onto provider errors
    ///
    /// `lookup` names the record kind and id for 404 responses of detail
    /// resources.
    async fn fetch(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        lookup: Option<(&str, &str)>,
        operation: &str,
    ) -> ProbeResult<String> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "Forwarding probe request");

        let response = self
            .client
            .request(method, url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| ProbeError::Remote {
                message: format!("{}: {}", url, e),
            })?;

        match response.status() {
            status if status.is_success() => {
                response.text().await.map_err(|e| ProbeError::Remote {
                    message: format!("{}: {}", url, e),
                })
            }
            StatusCode::NOT_IMPLEMENTED => Err(ProbeError::unsupported(operation)),
            status => match (status, lookup) {
                (StatusCode::NOT_FOUND, Some((kind, id))) => Err(ProbeError::not_found(kind, id)),
                _ => Err(ProbeError::Remote {
                    message: format!("{} returned {}", url, status),
                }),
            },
        }
    }

    async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        operation: &str,
    ) -> ProbeResult<String> {
        self.fetch(Method::GET, segments, query, None, operation).await
    }

    async fn get_detail(
        &self,
        segments: &[&str],
        kind: &str,
        id: &str,
        operation: &str,
    ) -> ProbeResult<String> {
        self.fetch(Method::GET, segments, &[], Some((kind, id)), operation)
            .await
    }
}

fn page_query(
    page_index: usize,
    page_size: usize,
    filters: &str,
    representation: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page_index.to_string()),
        ("pageSize", page_size.to_string()),
    ];
    if !filters.is_empty() {
        query.push(("filters", filters.to_string()));
    }
    if let Some(representation) = representation {
        query.push(("representation", representation.to_string()));
    }
    query
}

#[async_trait]
impl DataProvider for RemoteProvider {
    async fn receive_deployment(&self) -> ProbeResult<String> {
        self.get(&["deployment"], &[], "receive_deployment").await
    }

    async fn receive_beans(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
        representation: Option<&str>,
    ) -> ProbeResult<String> {
        let query = page_query(page_index, page_size, filters, representation);
        self.get(&["beans"], &query, "receive_beans").await
    }

    async fn receive_bean(
        &self,
        id: &str,
        transient_dependencies: bool,
        transient_dependents: bool,
    ) -> ProbeResult<String> {
        let query = [
            ("transientDependencies", transient_dependencies.to_string()),
            ("transientDependents", transient_dependents.to_string()),
        ];
        self.fetch(Method::GET, &["beans", id], &query, Some(("bean", id)), "receive_bean")
            .await
    }

    async fn receive_bean_instance(&self, id: &str) -> ProbeResult<String> {
        self.get_detail(&["beans", id, "instance"], "bean", id, "receive_bean_instance")
            .await
    }

    async fn receive_observers(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let query = page_query(page_index, page_size, filters, None);
        self.get(&["observers"], &query, "receive_observers").await
    }

    async fn receive_observer(&self, id: &str) -> ProbeResult<String> {
        self.get_detail(&["observers", id], "observer", id, "receive_observer")
            .await
    }

    async fn receive_contexts(&self) -> ProbeResult<String> {
        self.get(&["contexts"], &[], "receive_contexts").await
    }

    async fn receive_context(&self, id: &str) -> ProbeResult<String> {
        self.get(&["contexts", id], &[], "receive_context").await
    }

    async fn receive_invocations(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let query = page_query(page_index, page_size, filters, None);
        self.get(&["invocations"], &query, "receive_invocations").await
    }

    async fn receive_invocation(&self, id: &str) -> ProbeResult<String> {
        self.get_detail(&["invocations", id], "invocation", id, "receive_invocation")
            .await
    }

    async fn clear_invocations(&self) -> ProbeResult<String> {
        self.fetch(Method::DELETE, &["invocations"], &[], None, "clear_invocations")
            .await
    }

    async fn receive_events(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
    ) -> ProbeResult<String> {
        let query = page_query(page_index, page_size, filters, None);
        self.get(&["events"], &query, "receive_events").await
    }

    async fn receive_event(&self, id: &str) -> ProbeResult<String> {
        self.get_detail(&["events", id], "event", id, "receive_event")
            .await
    }

    async fn clear_events(&self) -> ProbeResult<String> {
        self.fetch(Method::DELETE, &["events"], &[], None, "clear_events")
            .await
    }

    async fn receive_monitoring_stats(&self) -> ProbeResult<String> {
        self.get(&["monitoring"], &[], "receive_monitoring_stats").await
    }

    async fn receive_available_beans(
        &self,
        page_index: usize,
        page_size: usize,
        filters: &str,
        representation: Option<&str>,
    ) -> ProbeResult<String> {
        let query = page_query(page_index, page_size, filters, representation);
        self.get(&["availableBeans"], &query, "receive_available_beans")
            .await
    }
}
