use super::{Filters, test_array_contains, test_contains_ignore_case, test_equals};
use crate::core::record::{array_field, fields, str_field};
use serde_json::Value;

/// Fired event list filters
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    container: Option<bool>,
    event_info: Option<String>,
    event_type: Option<String>,
    qualifiers: Option<String>,
}

impl Filters for EventFilters {
    fn process_filter(&mut self, name: &str, value: &str) {
        match name {
            fields::EVENT_INFO => self.event_info = Some(value.to_string()),
            fields::TYPE => self.event_type = Some(value.to_string()),
            fields::QUALIFIERS => self.qualifiers = Some(value.to_string()),
            fields::KIND => {
                if value.eq_ignore_ascii_case(fields::CONTAINER) {
                    self.container = Some(true);
                } else if value.eq_ignore_ascii_case(fields::APPLICATION) {
                    self.container = Some(false);
                }
            }
            _ => {}
        }
    }

    fn matches(&self, event: &Value) -> bool {
        test_contains_ignore_case(
            self.event_info.as_deref(),
            str_field(event, fields::EVENT_INFO),
        ) && test_contains_ignore_case(self.event_type.as_deref(), str_field(event, fields::TYPE))
            && test_array_contains(
                self.qualifiers.as_deref(),
                array_field(event, fields::QUALIFIERS),
            )
            && test_equals(
                self.container.as_ref(),
                str_field(event, fields::KIND).map(|kind| kind.eq_ignore_ascii_case(fields::CONTAINER)),
            )
    }

    fn is_empty(&self) -> bool {
        self.container.is_none()
            && self.event_info.is_none()
            && self.event_type.is_none()
            && self.qualifiers.is_none()
    }
}
