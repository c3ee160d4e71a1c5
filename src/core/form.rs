//! # Form State
//!
//! Values keyed by field name, per-field error messages, and the
//! `submitting` flag.
//!
//! Values are only replaced through `on_change`, one key at a time. The
//! map is never edited in place: each change builds a new map with the
//! single key swapped, leaving every other entry untouched.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::core::schema::{DataSource, FieldDescriptor, FieldType, TextSubtype};

/// Field name → error message.
pub type FieldErrors = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_A_NUMBER_MESSAGE: &str = "Must be a number.";
pub const INVALID_OPTION_MESSAGE: &str = "Selected option is not valid.";

/// Current value of every field, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Value>);

impl FormValues {
    /// Each field's default, or `null`.
    pub fn from_schema(elements: &[FieldDescriptor]) -> Self {
        Self(
            elements
                .iter()
                .map(|e| {
                    let value = e.default_value().cloned().unwrap_or(Value::Null);
                    (e.name.clone(), value)
                })
                .collect(),
        )
    }

    /// A copy with exactly one key replaced.
    pub fn with_value(&self, name: &str, value: Value) -> Self {
        let mut next = self.0.clone();
        next.insert(name.to_string(), value);
        Self(next)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The value as text, for rendering into an input.
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl FormState {
    pub fn new(elements: &[FieldDescriptor]) -> Self {
        Self {
            values: FormValues::from_schema(elements),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    /// Replace one field's value.
    pub fn on_change(&mut self, name: &str, value: Value) {
        debug!("Field '{}' changed: {}", name, value);
        self.values = self.values.with_value(name, value);
    }
}

/// Client-side checks declared in the schema.
///
/// Required fields must be non-empty; text lengths must sit within the
/// declared `min_length`/`max_length`; number subtypes must parse; static
/// select values must be one of the options.
pub fn validate(elements: &[FieldDescriptor], values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for element in elements {
        if let Some(message) = check_element(element, values.get(&element.name)) {
            errors.insert(element.name.clone(), message);
        }
    }
    errors
}

fn check_element(element: &FieldDescriptor, value: Option<&Value>) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    if text.trim().is_empty() {
        return (!element.optional).then(|| REQUIRED_MESSAGE.to_string());
    }

    match element.field_type {
        FieldType::Text | FieldType::Textarea => {
            let length = text.chars().count();
            if let Some(min) = element.min_length()
                && length < min
            {
                return Some(format!("Must be at least {min} characters."));
            }
            if let Some(max) = element.max_length()
                && length > max
            {
                return Some(format!("Must be no more than {max} characters."));
            }
            if element.field_type == FieldType::Text
                && element.subtype == Some(TextSubtype::Number)
                && !text.trim().parse::<f64>().is_ok_and(f64::is_finite)
            {
                return Some(NOT_A_NUMBER_MESSAGE.to_string());
            }
            None
        }
        FieldType::Select => {
            let static_options = element.data_source() == DataSource::Custom
                && !element.options().is_empty();
            if static_options && !element.options().iter().any(|o| o.value == text) {
                return Some(INVALID_OPTION_MESSAGE.to_string());
            }
            None
        }
        FieldType::Unsupported(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{select_field, text_field};
    use serde_json::json;

    #[test]
    fn test_from_schema_uses_defaults_or_null() {
        let elements = vec![
            text_field("a", Some("x")),
            select_field("b", DataSource::Channels, None),
        ];
        let values = FormValues::from_schema(&elements);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("a"), Some(&json!("x")));
        assert_eq!(values.get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_from_schema_treats_empty_default_as_null() {
        let elements: Vec<FieldDescriptor> = serde_json::from_value(json!([
            {"name": "a", "display_name": "A", "type": "text", "default": ""},
            {"name": "b", "display_name": "B", "type": "select", "data_source": "channels", "default": ""}
        ]))
        .unwrap();
        let values = FormValues::from_schema(&elements);
        assert_eq!(values.get("a"), Some(&Value::Null));
        assert_eq!(values.get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_with_value_touches_one_key() {
        let elements = vec![
            text_field("a", Some("x")),
            text_field("b", Some("y")),
            text_field("c", None),
        ];
        let before = FormValues::from_schema(&elements);
        let after = before.with_value("b", json!("changed"));

        assert_eq!(after.get("b"), Some(&json!("changed")));
        for key in ["a", "c"] {
            assert_eq!(before.get(key), after.get(key));
        }
        // The source map is untouched
        assert_eq!(before.get("b"), Some(&json!("y")));
    }

    #[test]
    fn test_text_renders_scalars() {
        let values = FormValues::default()
            .with_value("n", json!(5))
            .with_value("s", json!("hi"))
            .with_value("z", Value::Null);
        assert_eq!(values.text("n"), "5");
        assert_eq!(values.text("s"), "hi");
        assert_eq!(values.text("z"), "");
        assert_eq!(values.text("missing"), "");
    }

    #[test]
    fn test_required_fields() {
        let mut optional = text_field("opt", None);
        optional.optional = true;
        let elements = vec![text_field("req", None), optional];
        let values = FormValues::from_schema(&elements);

        let errors = validate(&elements, &values);
        assert_eq!(errors.get("req").map(String::as_str), Some(REQUIRED_MESSAGE));
        assert!(!errors.contains_key("opt"));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let elements = vec![text_field("req", None)];
        let values = FormValues::from_schema(&elements).with_value("req", json!("   "));
        assert!(validate(&elements, &values).contains_key("req"));
    }

    #[test]
    fn test_length_bounds() {
        let mut field = text_field("code", None);
        field.min_length = Some(3);
        field.max_length = Some(5);
        let elements = vec![field];

        let short = FormValues::default().with_value("code", json!("ab"));
        assert_eq!(
            validate(&elements, &short).get("code").map(String::as_str),
            Some("Must be at least 3 characters.")
        );

        let long = FormValues::default().with_value("code", json!("abcdef"));
        assert_eq!(
            validate(&elements, &long).get("code").map(String::as_str),
            Some("Must be no more than 5 characters.")
        );

        let ok = FormValues::default().with_value("code", json!("abcd"));
        assert!(validate(&elements, &ok).is_empty());
    }

    #[test]
    fn test_optional_empty_skips_length_checks() {
        let mut field = text_field("code", None);
        field.optional = true;
        field.min_length = Some(3);
        let elements = vec![field];
        let values = FormValues::from_schema(&elements);
        assert!(validate(&elements, &values).is_empty());
    }

    #[test]
    fn test_number_subtype() {
        let mut field = text_field("age", None);
        field.subtype = Some(TextSubtype::Number);
        let elements = vec![field];

        let bad = FormValues::default().with_value("age", json!("old"));
        assert_eq!(
            validate(&elements, &bad).get("age").map(String::as_str),
            Some(NOT_A_NUMBER_MESSAGE)
        );
        let good = FormValues::default().with_value("age", json!("42"));
        assert!(validate(&elements, &good).is_empty());
    }

    #[test]
    fn test_number_subtype_rejects_non_finite() {
        let mut field = text_field("age", None);
        field.subtype = Some(TextSubtype::Number);
        let elements = vec![field];

        for text in ["NaN", "inf", "-infinity"] {
            let values = FormValues::default().with_value("age", json!(text));
            assert_eq!(
                validate(&elements, &values).get("age").map(String::as_str),
                Some(NOT_A_NUMBER_MESSAGE),
                "{text} should not count as a number"
            );
        }
    }

    #[test]
    fn test_static_select_value_must_be_listed() {
        let elements = vec![select_field("prio", DataSource::Custom, None)];
        let bad = FormValues::default().with_value("prio", json!("p9"));
        assert_eq!(
            validate(&elements, &bad).get("prio").map(String::as_str),
            Some(INVALID_OPTION_MESSAGE)
        );
        let good = FormValues::default().with_value("prio", json!("p1"));
        assert!(validate(&elements, &good).is_empty());
    }

    #[test]
    fn test_on_change() {
        let elements = vec![text_field("a", None)];
        let mut form = FormState::new(&elements);
        form.on_change("a", json!("typed"));
        assert_eq!(form.values.get("a"), Some(&json!("typed")));
        assert!(!form.submitting);
    }
}
