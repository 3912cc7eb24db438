//! Query parameters and pagination utilities

use crate::core::filter::Filters;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Page size used when the request does not carry `pageSize`
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Query parameters understood by the probe resources
///
/// Built from the raw query string rather than through a typed extractor so
/// that a malformed `page=abc` falls back to the default instead of failing
/// the whole request.
///
/// # Example
/// ```text
/// GET /weld-probe/beans?page=2&pageSize=10
/// GET /weld-probe/beans?filters=kind:MANAGED%20beanClass:Foo
/// GET /weld-probe/beans/abc?transientDependencies=true
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Page number (starts at 0)
    pub page: usize,

    /// Number of items per page, `0` disables paging
    pub page_size: usize,

    /// Raw filter expression, see [`crate::core::filter::parse_filters`]
    pub filters: Option<String>,

    /// Requested representation, currently inert
    pub representation: Option<String>,

    /// Keep the nested dependencies of a bean's dependencies
    pub transient_dependencies: bool,

    /// Keep the nested dependents of a bean's dependents
    pub transient_dependents: bool,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl QueryParams {
    /// Defaults with a custom page size
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size,
            filters: None,
            representation: None,
            transient_dependencies: false,
            transient_dependents: false,
        }
    }

    /// Read parameters from decoded query pairs
    pub fn from_map(params: &HashMap<String, String>, default_page_size: usize) -> Self {
        let mut query = Self::with_page_size(default_page_size);
        if let Some(page) = params.get("page").and_then(|v| v.trim().parse().ok()) {
            query.page = page;
        }
        if let Some(size) = params.get("pageSize").and_then(|v| v.trim().parse().ok()) {
            query.page_size = size;
        }
        query.filters = params.get("filters").filter(|v| !v.is_empty()).cloned();
        query.representation = params
            .get("representation")
            .filter(|v| !v.is_empty())
            .cloned();
        query.transient_dependencies = parse_flag(params.get("transientDependencies"));
        query.transient_dependents = parse_flag(params.get("transientDependents"));
        query
    }

    /// Filter expression as a string slice, empty when absent
    pub fn filters(&self) -> &str {
        self.filters.as_deref().unwrap_or("")
    }
}

fn parse_flag(value: Option<&String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// A bounded, metadata-annotated slice of a filtered collection
///
/// Serializes to the list envelope `{ page, lastPage, total, data }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Requested page index (starts at 0)
    #[serde(rename = "page")]
    pub index: usize,

    /// Index of the last page, `0` for an empty collection
    #[serde(rename = "lastPage")]
    pub last_index: usize,

    /// Number of items after filtering
    pub total: usize,

    /// Items of the requested page
    #[serde(rename = "data")]
    pub items: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Encode the page envelope as JSON text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Index of the last page for `total` items
pub fn last_page_index(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        0
    } else {
        total.div_ceil(page_size) - 1
    }
}

/// Filter `items` in source order and cut out one page
///
/// `filters == None` keeps every item. Pages past the end come back empty
/// with the true `total` and `last_index`; a `page_size` of `0` returns every
/// matching item.
pub fn paginate<'a, F: Filters>(
    items: &'a [Value],
    filters: Option<&F>,
    page_index: usize,
    page_size: usize,
) -> Page<&'a Value> {
    let matching: Vec<&Value> = match filters {
        Some(filters) => items.iter().filter(|item| filters.matches(item)).collect(),
        None => items.iter().collect(),
    };
    let total = matching.len();
    let last_index = last_page_index(total, page_size);

    let items = if page_size == 0 {
        matching
    } else {
        let start = page_index.saturating_mul(page_size);
        if start >= total {
            Vec::new()
        } else {
            let end = total.min(start.saturating_add(page_size));
            matching[start..end].to_vec()
        }
    };

    Page {
        index: page_index,
        last_index,
        total,
        items,
    }
}
