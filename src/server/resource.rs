//! Probe resource table
//!
//! Each resource is a path pattern below `/weld-probe`, the verbs it accepts
//! and the handler serving it. Lookups walk the table in declaration order
//! and stop at the first match.

use super::handlers;
use super::host::ProbeHost;
use crate::core::error::ProbeResult;
use crate::core::query::QueryParams;
use axum::http::Method;
use axum::response::Response;
use futures::future::BoxFuture;
use std::sync::Arc;

/// URL prefix of every probe resource below the context path
pub const PROBE_PREFIX: &str = "/weld-probe";

/// Verbs the dispatcher knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
    Options,
}

impl HttpMethod {
    /// Map a request method, `None` for verbs outside the known set
    pub fn from_method(method: &Method) -> Option<Self> {
        [
            (Method::GET, HttpMethod::Get),
            (Method::POST, HttpMethod::Post),
            (Method::DELETE, HttpMethod::Delete),
            (Method::OPTIONS, HttpMethod::Options),
        ]
        .into_iter()
        .find_map(|(known, verb)| (known == method).then_some(verb))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// One element of a resource path pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    /// Matches any single segment and captures it
    Param,
}

/// Request data handed to a resource handler
pub struct ResourceRequest {
    pub method: HttpMethod,
    pub host: Arc<ProbeHost>,
    /// Captured `{id}` segments, in path order
    pub params: Vec<String>,
    pub query: QueryParams,
}

impl ResourceRequest {
    /// First captured segment, empty when the pattern has none
    pub fn id(&self) -> &str {
        self.params.first().map(String::as_str).unwrap_or_default()
    }
}

pub type ResourceHandler = fn(ResourceRequest) -> BoxFuture<'static, ProbeResult<Response>>;

/// A probe resource
pub struct Resource {
    pub name: &'static str,
    pub pattern: &'static [Segment],
    pub methods: &'static [HttpMethod],
    pub handler: ResourceHandler,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("methods", &self.methods)
            .finish()
    }
}

impl Resource {
    /// Captured parameters when `parts` matches the pattern exactly
    pub fn matches(&self, parts: &[String]) -> Option<Vec<String>> {
        if parts.len() != self.pattern.len() {
            return None;
        }
        let mut params = Vec::new();
        for (segment, part) in self.pattern.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if *literal == part.as_str() => {}
                Segment::Literal(_) => return None,
                Segment::Param => params.push(part.clone()),
            }
        }
        Some(params)
    }

    pub fn supports(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Value of the `Allow` header for this resource
    pub fn allow_header(&self) -> String {
        self.methods
            .iter()
            .map(HttpMethod::as_str)
            .chain(std::iter::once(HttpMethod::Options.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

use HttpMethod::{Delete, Get};
use Segment::{Literal, Param};

/// Bundled client page served at the prefix itself
pub static CLIENT_RESOURCE: Resource = Resource {
    name: "CLIENT_RESOURCE",
    pattern: &[],
    methods: &[Get],
    handler: handlers::client,
};

pub static RESOURCES: &[Resource] = &[
    Resource {
        name: "DEPLOYMENT",
        pattern: &[Literal("deployment")],
        methods: &[Get],
        handler: handlers::deployment,
    },
    Resource {
        name: "BEANS",
        pattern: &[Literal("beans")],
        methods: &[Get],
        handler: handlers::beans,
    },
    Resource {
        name: "BEAN",
        pattern: &[Literal("beans"), Param],
        methods: &[Get],
        handler: handlers::bean,
    },
    Resource {
        name: "BEAN_INSTANCE",
        pattern: &[Literal("beans"), Param, Literal("instance")],
        methods: &[Get],
        handler: handlers::bean_instance,
    },
    Resource {
        name: "OBSERVERS",
        pattern: &[Literal("observers")],
        methods: &[Get],
        handler: handlers::observers,
    },
    Resource {
        name: "OBSERVER",
        pattern: &[Literal("observers"), Param],
        methods: &[Get],
        handler: handlers::observer,
    },
    Resource {
        name: "CONTEXTS",
        pattern: &[Literal("contexts")],
        methods: &[Get],
        handler: handlers::contexts,
    },
    Resource {
        name: "CONTEXT",
        pattern: &[Literal("contexts"), Param],
        methods: &[Get],
        handler: handlers::context,
    },
    Resource {
        name: "INVOCATIONS",
        pattern: &[Literal("invocations")],
        methods: &[Get, Delete],
        handler: handlers::invocations,
    },
    Resource {
        name: "INVOCATION",
        pattern: &[Literal("invocations"), Param],
        methods: &[Get],
        handler: handlers::invocation,
    },
    Resource {
        name: "EVENTS",
        pattern: &[Literal("events")],
        methods: &[Get, Delete],
        handler: handlers::events,
    },
    Resource {
        name: "EVENT",
        pattern: &[Literal("events"), Param],
        methods: &[Get],
        handler: handlers::event,
    },
    Resource {
        name: "MONITORING_STATS",
        pattern: &[Literal("monitoring")],
        methods: &[Get],
        handler: handlers::monitoring_stats,
    },
    Resource {
        name: "AVAILABLE_BEANS",
        pattern: &[Literal("availableBeans")],
        methods: &[Get],
        handler: handlers::available_beans,
    },
];

/// Split a path into its non-empty segments
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve path segments below the prefix to a resource
///
/// No segments at all select the client page.
pub fn match_resource(parts: &[String]) -> Option<(&'static Resource, Vec<String>)> {
    if parts.is_empty() {
        return Some((&CLIENT_RESOURCE, Vec::new()));
    }
    RESOURCES
        .iter()
        .find_map(|resource| resource.matches(parts).map(|params| (resource, params)))
}
