//! Resource handlers
//!
//! Each handler forwards one request to the data provider and wraps the JSON
//! text it returns. Errors go back to the dispatcher untouched.

use super::resource::{HttpMethod, ResourceRequest};
use crate::core::error::ProbeResult;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use futures::future::BoxFuture;

const CLIENT_PAGE: &str = include_str!("../../client/index.html");

fn json(body: String) -> ProbeResult<Response> {
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub fn client(_request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            CLIENT_PAGE,
        )
            .into_response())
    }
    .boxed()
}

pub fn deployment(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_deployment().await?) }.boxed()
}

pub fn beans(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let q = &request.query;
        json(
            request
                .host
                .provider
                .receive_beans(q.page, q.page_size, q.filters(), q.representation.as_deref())
                .await?,
        )
    }
    .boxed()
}

pub fn bean(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let q = &request.query;
        json(
            request
                .host
                .provider
                .receive_bean(request.id(), q.transient_dependencies, q.transient_dependents)
                .await?,
        )
    }
    .boxed()
}

pub fn bean_instance(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_bean_instance(request.id()).await?) }.boxed()
}

pub fn observers(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let q = &request.query;
        json(
            request
                .host
                .provider
                .receive_observers(q.page, q.page_size, q.filters())
                .await?,
        )
    }
    .boxed()
}

pub fn observer(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_observer(request.id()).await?) }.boxed()
}

pub fn contexts(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_contexts().await?) }.boxed()
}

pub fn context(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_context(request.id()).await?) }.boxed()
}

/// GET lists, DELETE clears the history
pub fn invocations(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let provider = &request.host.provider;
        let q = &request.query;
        let body = match request.method {
            HttpMethod::Delete => provider.clear_invocations().await?,
            _ => {
                provider
                    .receive_invocations(q.page, q.page_size, q.filters())
                    .await?
            }
        };
        json(body)
    }
    .boxed()
}

pub fn invocation(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_invocation(request.id()).await?) }.boxed()
}

/// GET lists, DELETE clears the history
pub fn events(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let provider = &request.host.provider;
        let q = &request.query;
        let body = match request.method {
            HttpMethod::Delete => provider.clear_events().await?,
            _ => provider.receive_events(q.page, q.page_size, q.filters()).await?,
        };
        json(body)
    }
    .boxed()
}

pub fn event(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_event(request.id()).await?) }.boxed()
}

pub fn monitoring_stats(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move { json(request.host.provider.receive_monitoring_stats().await?) }.boxed()
}

pub fn available_beans(request: ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>> {
    async move {
        let q = &request.query;
        json(
            request
                .host
                .provider
                .receive_available_beans(
                    q.page,
                    q.page_size,
                    q.filters(),
                    q.representation.as_deref(),
                )
                .await?,
        )
    }
    .boxed()
}
