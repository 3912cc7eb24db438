//! Untyped records and the field names the probe documents use
//!
//! Every introspected entity (bean, observer, fired event, invocation tree,
//! context) is kept as a plain [`serde_json::Value`]. There is no schema:
//! fields are looked up by name and may be missing.

use serde_json::Value;

/// One introspected entity
pub type Record = Value;

/// Field and filter key names shared by the documents and the query layer
pub mod fields {
    pub const ID: &str = "id";
    pub const BDA_ID: &str = "bdaId";
    pub const BDAS: &str = "bdas";
    pub const BDA: &str = "bda";
    pub const DATA: &str = "data";

    pub const KIND: &str = "kind";
    pub const BEAN_CLASS: &str = "beanClass";
    pub const BEAN_TYPE: &str = "beanType";
    pub const TYPES: &str = "types";
    pub const QUALIFIER: &str = "qualifier";
    pub const QUALIFIERS: &str = "qualifiers";
    pub const SCOPE: &str = "scope";
    pub const IS_ALTERNATIVE: &str = "isAlternative";
    pub const STEREOTYPES: &str = "stereotypes";
    pub const UNUSED: &str = "unused";
    pub const DEPENDENCIES: &str = "dependencies";
    pub const DEPENDENTS: &str = "dependents";

    pub const OBSERVED_TYPE: &str = "observedType";
    pub const RECEPTION: &str = "reception";
    pub const TX_PHASE: &str = "txPhase";
    pub const DECLARING_BEAN: &str = "declaringBean";

    pub const EVENT_INFO: &str = "eventInfo";
    pub const TYPE: &str = "type";
    pub const CONTAINER: &str = "container";
    pub const APPLICATION: &str = "application";

    pub const METHOD_NAME: &str = "methodName";
    pub const DECLARING_CLASS: &str = "declaringClass";
    pub const INTERCEPTED_BEAN: &str = "interceptedBean";
    pub const DESCRIPTION: &str = "description";
    pub const SEARCH: &str = "search";
    pub const CHILDREN: &str = "children";

    pub const PAGE: &str = "page";
    pub const LAST_PAGE: &str = "lastPage";
    pub const TOTAL: &str = "total";

    pub const FIRED_EVENT_COUNT: &str = "firedEventCount";
    pub const INVOCATION_COUNT: &str = "invocationCount";
}

/// String value of a field, `None` when missing or not a string
pub fn str_field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str)
}

/// Boolean value of a field, `None` when missing or not a boolean
pub fn bool_field(record: &Value, name: &str) -> Option<bool> {
    record.get(name).and_then(Value::as_bool)
}

/// Array value of a field, `None` when missing or not an array
pub fn array_field<'a>(record: &'a Value, name: &str) -> Option<&'a Vec<Value>> {
    record.get(name).and_then(Value::as_array)
}

/// Identifier of a record as text
///
/// Ids are usually strings, but numeric ids are compared by their textual form.
pub fn record_id(record: &Value) -> Option<String> {
    match record.get(fields::ID)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Find the first record whose `id` equals `id`
pub fn find_by_id<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record_id(record).is_some_and(|rid| rid == id))
}
