use super::{Filters, contains_ignore_case, test_contains_ignore_case};
use crate::core::record::{array_field, fields, str_field};
use serde_json::Value;

/// Invocation tree filters
///
/// `search` looks through the whole tree; the other keys only look at the
/// root invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationFilters {
    bean_class: Option<String>,
    method_name: Option<String>,
    search: Option<String>,
    description: Option<String>,
}

impl InvocationFilters {
    /// Declaring class of the invocation, falling back to the intercepted bean
    fn bean_class_of(invocation: &Value) -> Option<&str> {
        str_field(invocation, fields::DECLARING_CLASS).or_else(|| {
            invocation
                .get(fields::INTERCEPTED_BEAN)
                .and_then(|bean| str_field(bean, fields::BEAN_CLASS))
        })
    }
}

/// Depth-first text search over an invocation and all of its descendants
pub fn test_search(search: Option<&str>, invocation: &Value) -> bool {
    let Some(search) = search else {
        return true;
    };
    if contains_ignore_case(str_field(invocation, fields::BEAN_CLASS), search)
        || contains_ignore_case(str_field(invocation, fields::METHOD_NAME), search)
    {
        return true;
    }
    array_field(invocation, fields::CHILDREN)
        .is_some_and(|children| children.iter().any(|child| test_search(Some(search), child)))
}

impl Filters for InvocationFilters {
    fn process_filter(&mut self, name: &str, value: &str) {
        match name {
            fields::BEAN_CLASS => self.bean_class = Some(value.to_string()),
            fields::METHOD_NAME => self.method_name = Some(value.to_string()),
            fields::SEARCH => self.search = Some(value.to_string()),
            fields::DESCRIPTION => self.description = Some(value.to_string()),
            _ => {}
        }
    }

    fn matches(&self, invocation: &Value) -> bool {
        test_search(self.search.as_deref(), invocation)
            && test_contains_ignore_case(self.bean_class.as_deref(), Self::bean_class_of(invocation))
            && test_contains_ignore_case(
                self.method_name.as_deref(),
                str_field(invocation, fields::METHOD_NAME),
            )
            && test_contains_ignore_case(
                self.description.as_deref(),
                str_field(invocation, fields::DESCRIPTION),
            )
    }

    fn is_empty(&self) -> bool {
        self.bean_class.is_none()
            && self.method_name.is_none()
            && self.search.is_none()
            && self.description.is_none()
    }
}
