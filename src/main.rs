//! Probe Adapter - serves the probe REST API and client
//!
//! Reads an exported probe archive (or forwards to a live probe) and exposes
//! the `/weld-probe` resources over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Serve an exported archive on http://127.0.0.1:8181/probe-client-adapter/weld-probe
//! probe-adapter weld-probe-export.zip
//!
//! # Forward to a running application
//! probe-adapter --remote http://localhost:8080/app/weld-probe --port 9000
//! ```
//!
//! On Unix, `SIGHUP` reloads the data source and restarts the listener.

use anyhow::Result;
use axum::Router;
use clap::Parser;
use probe::config::{AdapterConfig, SourceConfig};
use probe::server::{ProbeServer, ServerBuilder, shutdown_signal};
use probe::storage::open_provider;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Pause between attempts to bind the address again after a reload
#[cfg(unix)]
const REBIND_DELAY: Duration = Duration::from_secs(1);

/// Probe REST API and client over an exported archive or a live probe
#[derive(Parser, Debug)]
#[command(name = "probe-adapter")]
#[command(about = "Serves probe data from an exported archive or a live remote probe")]
#[command(version)]
struct Args {
    /// Exported probe archive (zip file or unpacked directory)
    archive: Option<PathBuf>,

    /// Base URL of a live probe, e.g. http://localhost:8080/app/weld-probe
    #[arg(short, long, conflicts_with = "archive")]
    remote: Option<String>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Path the probe resources are mounted under
    #[arg(long)]
    context_path: Option<String>,

    /// Default page size for list resources (0 disables paging)
    #[arg(long)]
    page_size: Option<usize>,

    /// YAML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Load the configuration file, if any, and apply the flags on top
    fn into_config(self) -> Result<AdapterConfig> {
        let mut config = match &self.config {
            Some(path) => AdapterConfig::from_yaml_file(path)?,
            None => AdapterConfig::default(),
        };

        if let Some(archive) = self.archive {
            config.source = SourceConfig {
                archive: Some(archive),
                remote: None,
            };
        } else if let Some(remote) = self.remote {
            config.source = SourceConfig {
                archive: None,
                remote: Some(remote),
            };
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(context_path) = self.context_path {
            config.context_path = context_path;
        }
        if let Some(page_size) = self.page_size {
            config.default_page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Read the data source and build the router
fn build_app(config: &AdapterConfig) -> Result<Router> {
    let provider = open_provider(&config.data_source()?, config.remote_timeout())?;
    ServerBuilder::new()
        .with_shared_provider(provider)
        .with_context_path(config.normalized_context_path())
        .with_default_page_size(config.default_page_size)
        .build()
}

/// [`build_app`] off the async workers, since reading an archive blocks
async fn load_app(config: &AdapterConfig) -> Result<Router> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || build_app(&config)).await?
}

/// Reload the data source and restart the listener on the same address
///
/// A failed reload keeps the current server. Once the old listener is
/// stopped, binding is retried until it succeeds; `None` means shutdown was
/// requested in the meantime.
#[cfg(unix)]
async fn reload(config: &AdapterConfig, server: ProbeServer) -> Option<ProbeServer> {
    let app = match load_app(config).await {
        Ok(app) => app,
        Err(e) => {
            error!("Reload failed, keeping the current data: {:#}", e);
            return Some(server);
        }
    };

    let addr = server.local_addr().to_string();
    if let Err(e) = server.stop().await {
        error!("Listener on {} did not stop cleanly: {:#}", addr, e);
    }
    rebind(&addr, app).await
}

#[cfg(unix)]
async fn rebind(addr: &str, app: Router) -> Option<ProbeServer> {
    loop {
        match ProbeServer::start(addr, app.clone()).await {
            Ok(server) => return Some(server),
            Err(e) => error!("Cannot restart listener: {:#}, retrying", e),
        }
        tokio::select! {
            _ = shutdown_signal() => return None,
            _ = tokio::time::sleep(REBIND_DELAY) => {}
        }
    }
}

#[cfg(unix)]
async fn run(config: AdapterConfig, mut server: ProbeServer) -> Result<Option<ProbeServer>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            _ = shutdown_signal() => return Ok(Some(server)),
            _ = hangup.recv() => {
                info!("Received SIGHUP signal, reloading data source...");
                match reload(&config, server).await {
                    Some(restarted) => server = restarted,
                    None => return Ok(None),
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn run(_config: AdapterConfig, server: ProbeServer) -> Result<Option<ProbeServer>> {
    shutdown_signal().await;
    Ok(Some(server))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = args.into_config()?;

    info!("Probe Adapter v{}", env!("CARGO_PKG_VERSION"));
    let app = load_app(&config).await?;
    let server = ProbeServer::start(&config.bind_address(), app).await?;
    info!(
        "Probe client: http://{}{}{}",
        server.local_addr(),
        config.normalized_context_path(),
        probe::server::PROBE_PREFIX
    );

    if let Some(server) = run(config, server).await? {
        server.stop().await?;
    }
    info!("Server shutdown complete");
    Ok(())
}
