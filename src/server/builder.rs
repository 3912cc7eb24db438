//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ProbeHost;
use crate::config::DEFAULT_CONTEXT_PATH;
use crate::core::provider::DataProvider;
use crate::core::query::DEFAULT_PAGE_SIZE;
use anyhow::{Context, Result, anyhow};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Builder for the probe HTTP surface
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_provider(SnapshotProvider::open("export.zip")?)
///     .with_context_path("/probe-client-adapter")
///     .build()?;
/// ```
pub struct ServerBuilder {
    provider: Option<Arc<dyn DataProvider>>,
    context_path: String,
    default_page_size: usize,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            provider: None,
            context_path: DEFAULT_CONTEXT_PATH.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            custom_routes: Vec::new(),
        }
    }

    /// Set the data provider (required)
    pub fn with_provider(mut self, provider: impl DataProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set an already shared data provider (required)
    pub fn with_shared_provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Mount point of the probe resources
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// Page size used when a request does not carry `pageSize`
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the shared host
    pub fn build_host(&self) -> Result<ProbeHost> {
        let provider = self
            .provider
            .clone()
            .ok_or_else(|| anyhow!("A data provider is required"))?;
        Ok(ProbeHost::new(provider).with_default_page_size(self.default_page_size))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, &self.context_path, custom_routes)
    }

    /// Bind and serve in the background
    pub async fn start(self, addr: &str) -> Result<ProbeServer> {
        ProbeServer::start(addr, self.build()?).await
    }

    /// Serve the application until Ctrl+C or SIGTERM
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_provider(provider)
    ///     .serve("127.0.0.1:8181").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running probe listener
///
/// The listener runs on its own task until [`stop`](Self::stop) is called.
/// Restarting binds the same address again with a new router, so a reloaded
/// backend can replace the old one without changing the URL.
pub struct ProbeServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ProbeServer {
    /// Bind `addr` and start serving `app`
    pub async fn start(addr: &str, app: Router) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Cannot bind {}", addr))?;
        let local_addr = listener.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await
        });

        tracing::info!("Server listening on {}", local_addr);
        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task.await.context("Server task failed")??;
        tracing::info!("Server on {} stopped", self.local_addr);
        Ok(())
    }

    /// Stop this listener, then serve `app` on the same address
    pub async fn restart(self, app: Router) -> Result<Self> {
        let addr = self.local_addr.to_string();
        self.stop().await?;
        Self::start(&addr, app).await
    }
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
