//! Filter engine for probe collections
//!
//! A request carries its filters as one string, e.g.
//! `kind:MANAGED beanClass:"com.acme.Order Service"`. [`parse_filters`] turns
//! it into key/value pairs and [`init_filters`] feeds them into the
//! resource-specific predicate ([`BeanFilters`], [`ObserverFilters`],
//! [`EventFilters`], [`InvocationFilters`]).
//!
//! Parsing never fails: fragments that are not `key:value` are dropped, and
//! unknown keys are ignored by the predicates.

mod bean;
mod event;
mod invocation;
mod kinds;
mod observer;

pub use bean::BeanFilters;
pub use event::EventFilters;
pub use invocation::InvocationFilters;
pub use kinds::{BeanKind, Reception, TransactionPhase};
pub use observer::ObserverFilters;

use crate::core::record::{fields, str_field};
use serde_json::Value;
use std::collections::HashMap;

/// Filter value selecting every module except the auxiliary ones
pub const FILTER_ADDITIONAL_BDAS_MARKER: &str = "probe-filterAdditionalBdas";

/// Identifier suffix of auxiliary (additional classes) modules
pub const ADDITIONAL_BDA_SUFFIX: &str = ".additionalClasses";

/// A resource-kind-specific predicate over records
pub trait Filters {
    /// Apply one `key:value` pair; unknown keys are no-ops
    fn process_filter(&mut self, name: &str, value: &str);

    /// Whether the record passes every active sub-test
    fn matches(&self, record: &Value) -> bool;

    /// Whether no filter is applied
    fn is_empty(&self) -> bool;
}

/// Split a raw filter expression into `(key, value)` pairs
///
/// Fragments are separated by whitespace; double quotes group whitespace
/// into one fragment and are removed. Each fragment is split at its first
/// `:`. Fragments with an empty key or value are dropped.
pub fn parse_filters(raw: &str) -> Vec<(String, String)> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in raw.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    fragments.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        fragments.push(current);
    }

    fragments
        .iter()
        .filter_map(|fragment| {
            let (name, value) = fragment.split_once(':')?;
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Feed a raw filter expression into `filters`
///
/// Returns `None` when the resulting predicate is empty, meaning the
/// collection should not be filtered at all.
pub fn init_filters<F: Filters>(raw: &str, mut filters: F) -> Option<F> {
    for (name, value) in parse_filters(raw) {
        filters.process_filter(&name, &value);
    }
    if filters.is_empty() {
        None
    } else {
        Some(filters)
    }
}

/// Case-insensitive substring test, `false` for a missing text
pub fn contains_ignore_case(text: Option<&str>, filter: &str) -> bool {
    text.is_some_and(|text| text.to_lowercase().contains(&filter.to_lowercase()))
}

/// Unset filter matches; a missing field counts as the empty string
pub fn test_contains_ignore_case(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(filter) => contains_ignore_case(Some(value.unwrap_or("")), filter),
    }
}

/// Unset filter matches; otherwise any string element must contain the filter
pub fn test_array_contains(filter: Option<&str>, values: Option<&Vec<Value>>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    values.is_some_and(|values| {
        values
            .iter()
            .any(|value| contains_ignore_case(value.as_str(), filter))
    })
}

/// Unset filter matches; otherwise strict equality with the field value
pub fn test_equals<T: PartialEq>(filter: Option<&T>, value: Option<T>) -> bool {
    match filter {
        None => true,
        Some(filter) => value.as_ref() == Some(filter),
    }
}

/// Deployment modules (bean deployment archives) of the inspected application
///
/// Maps a module's opaque `id`, as referenced by a record's `bdaId`, to the
/// module's human identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentModules {
    identifiers: HashMap<String, String>,
}

impl DeploymentModules {
    /// Read the `bdas` array of a deployment document
    pub fn from_deployment(deployment: &Value) -> Self {
        let identifiers = deployment
            .get(fields::BDAS)
            .and_then(Value::as_array)
            .map(|bdas| {
                bdas.iter()
                    .filter_map(|bda| {
                        let id = str_field(bda, fields::ID)?;
                        let identifier = str_field(bda, fields::BDA_ID)?;
                        Some((id.to_string(), identifier.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { identifiers }
    }

    /// Build from `(id, identifier)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            identifiers: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Human identifier of the module with the given id
    pub fn identifier(&self, id: &str) -> Option<&str> {
        self.identifiers.get(id).map(String::as_str)
    }

    /// Whether the module is flagged as auxiliary
    ///
    /// Ids missing from the deployment count as regular modules.
    pub fn is_additional(&self, id: &str) -> bool {
        self.identifier(id)
            .is_some_and(|identifier| identifier.ends_with(ADDITIONAL_BDA_SUFFIX))
    }

    /// Module sub-test against an object carrying a `bdaId`
    pub fn test_bda(&self, filter: Option<&str>, value: Option<&Value>) -> bool {
        let Some(filter) = filter else {
            return true;
        };
        let Some(bda_id) = value.and_then(|v| str_field(v, fields::BDA_ID)) else {
            return false;
        };
        if filter == FILTER_ADDITIONAL_BDAS_MARKER {
            !self.is_additional(bda_id)
        } else {
            bda_id == filter
        }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}
