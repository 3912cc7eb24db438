use super::{
    BeanKind, DeploymentModules, Filters, Reception, TransactionPhase, test_array_contains,
    test_contains_ignore_case, test_equals,
};
use crate::core::record::{array_field, fields, str_field};
use serde_json::Value;
use std::sync::Arc;

/// Observer method list filters
#[derive(Debug, Clone, Default)]
pub struct ObserverFilters {
    modules: Arc<DeploymentModules>,
    bean_class: Option<String>,
    observed_type: Option<String>,
    qualifier: Option<String>,
    reception: Option<Reception>,
    tx_phase: Option<TransactionPhase>,
    declaring_bean_kind: Option<BeanKind>,
    bda: Option<String>,
}

impl ObserverFilters {
    pub fn new(modules: Arc<DeploymentModules>) -> Self {
        Self {
            modules,
            ..Self::default()
        }
    }
}

impl Filters for ObserverFilters {
    fn process_filter(&mut self, name: &str, value: &str) {
        match name {
            fields::KIND => self.declaring_bean_kind = BeanKind::from_name(value),
            fields::BEAN_CLASS => self.bean_class = Some(value.to_string()),
            fields::OBSERVED_TYPE => self.observed_type = Some(value.to_string()),
            fields::QUALIFIER => self.qualifier = Some(value.to_string()),
            fields::RECEPTION => self.reception = Reception::from_name(value),
            fields::TX_PHASE => self.tx_phase = TransactionPhase::from_name(value),
            fields::BDA => self.bda = Some(value.to_string()),
            _ => {}
        }
    }

    fn matches(&self, observer: &Value) -> bool {
        let declaring_bean = observer.get(fields::DECLARING_BEAN);
        self.modules.test_bda(self.bda.as_deref(), declaring_bean)
            && test_contains_ignore_case(
                self.bean_class.as_deref(),
                str_field(observer, fields::BEAN_CLASS),
            )
            && test_array_contains(
                self.qualifier.as_deref(),
                array_field(observer, fields::QUALIFIERS),
            )
            && test_equals(
                self.declaring_bean_kind.as_ref(),
                declaring_bean
                    .and_then(|bean| str_field(bean, fields::KIND))
                    .and_then(BeanKind::from_name),
            )
            && test_equals(
                self.reception.as_ref(),
                str_field(observer, fields::RECEPTION).and_then(Reception::from_name),
            )
            && test_equals(
                self.tx_phase.as_ref(),
                str_field(observer, fields::TX_PHASE).and_then(TransactionPhase::from_name),
            )
            && test_contains_ignore_case(
                self.observed_type.as_deref(),
                str_field(observer, fields::OBSERVED_TYPE),
            )
    }

    fn is_empty(&self) -> bool {
        self.bean_class.is_none()
            && self.observed_type.is_none()
            && self.qualifier.is_none()
            && self.reception.is_none()
            && self.bda.is_none()
            && self.tx_phase.is_none()
            && self.declaring_bean_kind.is_none()
    }
}
