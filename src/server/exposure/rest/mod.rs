//! REST exposure of the probe resources
//!
//! Mounts the probe routes under the context path, redirects the site root
//! to the client page and adds the health and HTTP middleware layers.

use super::super::host::ProbeHost;
use super::super::resource::PROBE_PREFIX;
use crate::server::router::build_probe_routes;
use anyhow::{Result, bail};
use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::{self, Next};
use axum::response::{Redirect, Response};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Arguments
    ///
    /// * `host` - Shared provider and request defaults
    /// * `context_path` - Mount point of the probe resources, `""` or `"/"` for the root
    /// * `custom_routes` - Additional routes merged at the root
    ///
    /// # Returns
    ///
    /// A router with:
    /// - `{context_path}/weld-probe/...` probe resources
    /// - `/` and `{context_path}` redirecting to the client page
    /// - `/health` and `/healthz`
    pub fn build_router(
        host: Arc<ProbeHost>,
        context_path: &str,
        custom_routes: Vec<Router>,
    ) -> Result<Router> {
        let context_path = context_path.trim_end_matches('/');
        if !context_path.is_empty() && !context_path.starts_with('/') {
            bail!("Context path must start with '/': {}", context_path);
        }

        let client_url = format!("{}{}", context_path, PROBE_PREFIX);

        let mut app = Self::health_routes().merge(build_probe_routes(host, &client_url));
        app = app.route("/", Self::redirect_to(&client_url));
        if !context_path.is_empty() {
            app = app.route(context_path, Self::redirect_to(&client_url));
        }

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let plain = app.clone();
        Ok(app
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(middleware::from_fn_with_state(plain, Self::skip_cors_for_options))
            .layer(TraceLayer::new_for_http()))
    }

    /// Route OPTIONS requests that are not CORS preflights around the CORS layer
    ///
    /// `CorsLayer` answers every OPTIONS request itself; plain ones belong to
    /// the dispatcher (204 with `Allow`, 404 for unknown resources).
    async fn skip_cors_for_options(
        State(plain): State<Router>,
        request: Request,
        next: Next,
    ) -> Response {
        let preflight = request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
        if request.method() == Method::OPTIONS && !preflight {
            return match plain.oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };
        }
        next.run(request).await
    }

    fn redirect_to(target: &str) -> axum::routing::MethodRouter {
        let target = target.to_string();
        get(move || std::future::ready(Redirect::to(&target)))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "probe-adapter"
        }))
    }
}
