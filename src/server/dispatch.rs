//! Request dispatching for the probe resources
//!
//! Resolves the path below `/weld-probe` to a resource, checks the verb,
//! parses the query and runs the handler. Whatever the handler does, the
//! caller always gets an HTTP response.

use super::host::ProbeHost;
use super::resource::{HttpMethod, Resource, ResourceRequest, match_resource, split_path};
use crate::core::error::ProbeError;
use crate::core::query::QueryParams;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri, Version, header};
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Handler for the prefix itself
pub async fn dispatch_root(
    State(host): State<Arc<ProbeHost>>,
    method: Method,
    version: Version,
    uri: Uri,
) -> Response {
    dispatch(host, method, version, uri, Vec::new()).await
}

/// Handler for everything below the prefix
pub async fn dispatch_path(
    State(host): State<Arc<ProbeHost>>,
    Path(path): Path<String>,
    method: Method,
    version: Version,
    uri: Uri,
) -> Response {
    dispatch(host, method, version, uri, split_path(&path)).await
}

/// Error for a verb the resource cannot serve
///
/// HTTP/1.1 clients get `405`, older protocols a plain `400`.
pub fn method_error(method: &Method, version: Version, uri: &Uri) -> ProbeError {
    if version == Version::HTTP_11 {
        ProbeError::MethodNotAllowed {
            method: method.to_string(),
            path: uri.path().to_string(),
        }
    } else {
        ProbeError::BadRequest {
            message: format!("Method {} not supported for {}", method, uri.path()),
        }
    }
}

fn query_params(uri: &Uri, default_page_size: usize) -> QueryParams {
    let params = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(params)| params)
        .unwrap_or_default();
    QueryParams::from_map(&params, default_page_size)
}

fn method_not_allowed(resource: &Resource, error: ProbeError) -> Response {
    let mut response = error.into_response();
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        if let Ok(allow) = resource.allow_header().parse() {
            response.headers_mut().insert(header::ALLOW, allow);
        }
    }
    response
}

async fn dispatch(
    host: Arc<ProbeHost>,
    method: Method,
    version: Version,
    uri: Uri,
    parts: Vec<String>,
) -> Response {
    let Some((resource, params)) = match_resource(&parts) else {
        return ProbeError::not_found("resource", uri.path()).into_response();
    };

    let Some(http_method) = HttpMethod::from_method(&method) else {
        return method_not_allowed(resource, method_error(&method, version, &uri));
    };

    if http_method == HttpMethod::Options {
        return (
            StatusCode::NO_CONTENT,
            [(header::ALLOW, resource.allow_header())],
        )
            .into_response();
    }

    if !resource.supports(http_method) {
        return method_not_allowed(resource, method_error(&method, version, &uri));
    }

    tracing::debug!(resource = resource.name, %method, %uri, "Dispatching probe request");

    let request = ResourceRequest {
        method: http_method,
        query: query_params(&uri, host.default_page_size),
        host,
        params,
    };

    let outcome = AssertUnwindSafe((resource.handler)(request))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(ProbeError::Internal("handler panicked".to_string())));

    match outcome {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(
                resource = resource.name,
                %uri,
                status = error.status_code().as_u16(),
                "Cannot handle probe request: {}",
                error
            );
            error.into_response()
        }
    }
}
