use super::{
    BeanKind, DeploymentModules, Filters, test_array_contains, test_contains_ignore_case,
    test_equals,
};
use crate::core::record::{array_field, bool_field, fields, str_field};
use serde_json::Value;
use std::sync::Arc;

/// Bean list filters
#[derive(Debug, Clone, Default)]
pub struct BeanFilters {
    modules: Arc<DeploymentModules>,
    kind: Option<BeanKind>,
    bean_class: Option<String>,
    bean_type: Option<String>,
    qualifier: Option<String>,
    scope: Option<String>,
    bda: Option<String>,
    is_alternative: Option<bool>,
    stereotypes: Option<String>,
    unused: Option<bool>,
}

impl BeanFilters {
    pub fn new(modules: Arc<DeploymentModules>) -> Self {
        Self {
            modules,
            ..Self::default()
        }
    }
}

impl Filters for BeanFilters {
    fn process_filter(&mut self, name: &str, value: &str) {
        match name {
            fields::KIND => self.kind = BeanKind::from_name(value),
            fields::BEAN_CLASS => self.bean_class = Some(value.to_string()),
            fields::BEAN_TYPE => self.bean_type = Some(value.to_string()),
            fields::QUALIFIER => self.qualifier = Some(value.to_string()),
            fields::SCOPE => self.scope = Some(value.to_string()),
            fields::BDA => self.bda = Some(value.to_string()),
            fields::IS_ALTERNATIVE => self.is_alternative = Some(value.eq_ignore_ascii_case("true")),
            fields::STEREOTYPES => self.stereotypes = Some(value.to_string()),
            fields::UNUSED => self.unused = Some(value.eq_ignore_ascii_case("true")),
            _ => {}
        }
    }

    fn matches(&self, bean: &Value) -> bool {
        test_equals(
            self.kind.as_ref(),
            str_field(bean, fields::KIND).and_then(BeanKind::from_name),
        ) && test_equals(self.unused.as_ref(), bool_field(bean, fields::UNUSED))
            && test_equals(
                self.is_alternative.as_ref(),
                bool_field(bean, fields::IS_ALTERNATIVE),
            )
            && self.modules.test_bda(self.bda.as_deref(), Some(bean))
            && test_contains_ignore_case(
                self.bean_class.as_deref(),
                str_field(bean, fields::BEAN_CLASS),
            )
            && test_contains_ignore_case(self.scope.as_deref(), str_field(bean, fields::SCOPE))
            && test_array_contains(self.bean_type.as_deref(), array_field(bean, fields::TYPES))
            && test_array_contains(
                self.qualifier.as_deref(),
                array_field(bean, fields::QUALIFIERS),
            )
            && test_array_contains(
                self.stereotypes.as_deref(),
                array_field(bean, fields::STEREOTYPES),
            )
    }

    /// `unused:false` counts as no filter at all, unlike every other flag.
    fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.bean_class.is_none()
            && self.bean_type.is_none()
            && self.qualifier.is_none()
            && self.scope.is_none()
            && self.bda.is_none()
            && self.is_alternative.is_none()
            && self.stereotypes.is_none()
            && !self.unused.unwrap_or(false)
    }
}
