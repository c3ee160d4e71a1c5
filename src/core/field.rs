//! # Field Dispatch
//!
//! Turns one `FieldDescriptor` into the widget model that renders it.
//!
//! | type       | widget                     | max length default |
//! |------------|----------------------------|--------------------|
//! | `text`     | single-line text input     | 150                |
//! | `textarea` | multi-line text input      | 3000               |
//! | `select`   | autocomplete selector      | n/a                |
//! | other      | `DispatchError`            | n/a                |

use std::fmt;

use log::debug;
use serde_json::Value;

use crate::core::schema::{DataSource, FieldDescriptor, FieldType, TextSubtype};
use crate::core::selection::SelectedOption;
use crate::core::selector::AutocompleteSelector;

/// Keyboard the input should present (and which characters it accepts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardHint {
    #[default]
    Default,
    Email,
    Numeric,
    Phone,
    Url,
}

impl KeyboardHint {
    pub fn from_subtype(subtype: Option<&TextSubtype>) -> Self {
        match subtype {
            Some(TextSubtype::Email) => KeyboardHint::Email,
            Some(TextSubtype::Number) => KeyboardHint::Numeric,
            Some(TextSubtype::Tel) => KeyboardHint::Phone,
            Some(TextSubtype::Url) => KeyboardHint::Url,
            _ => KeyboardHint::Default,
        }
    }

    /// Whether a typed character is available on this keyboard.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            KeyboardHint::Numeric => c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'),
            KeyboardHint::Phone => {
                c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ' | '*' | '#')
            }
            KeyboardHint::Email | KeyboardHint::Url => !c.is_whitespace(),
            KeyboardHint::Default => true,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            KeyboardHint::Default => None,
            KeyboardHint::Email => Some("email"),
            KeyboardHint::Numeric => Some("number"),
            KeyboardHint::Phone => Some("phone"),
            KeyboardHint::Url => Some("url"),
        }
    }
}

/// Properties of a text or textarea input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputProps {
    pub max_length: usize,
    pub keyboard: KeyboardHint,
    pub multiline: bool,
    pub resizable: bool,
    /// Mask the entered text (password subtype).
    pub secure: bool,
}

/// A select element: the selector control plus the selection it last reported.
#[derive(Debug, Clone)]
pub struct SelectField {
    pub selector: AutocompleteSelector,
    selected: Option<SelectedOption>,
}

impl SelectField {
    pub fn new(selector: AutocompleteSelector) -> Self {
        Self {
            selector,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&SelectedOption> {
        self.selected.as_ref()
    }

    /// Store a selection and return the value to forward to `onChange`.
    ///
    /// `None` (dismissed selector) is a no-op.
    pub fn handle_autocomplete_select(&mut self, selected: Option<SelectedOption>) -> Option<Value> {
        let selected = selected?;
        let value = Value::String(selected.value.clone());
        self.selected = Some(selected);
        self.selector.sync_selected(self.selected.as_ref());
        Some(value)
    }
}

#[derive(Debug, Clone)]
pub enum FieldWidget {
    Text(TextInputProps),
    Select(SelectField),
}

impl FieldWidget {
    pub fn as_select_mut(&mut self) -> Option<&mut SelectField> {
        match self {
            FieldWidget::Select(select) => Some(select),
            FieldWidget::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    UnsupportedType { name: String, field_type: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnsupportedType { name, field_type } => {
                write!(f, "field '{name}' has unsupported type '{field_type}'")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Build the widget model for one element.
pub fn dispatch(descriptor: &FieldDescriptor) -> Result<FieldWidget, DispatchError> {
    match &descriptor.field_type {
        FieldType::Text => Ok(FieldWidget::Text(TextInputProps {
            max_length: descriptor.effective_max_length().unwrap_or_default(),
            keyboard: KeyboardHint::from_subtype(descriptor.subtype.as_ref()),
            multiline: false,
            resizable: false,
            secure: descriptor.subtype == Some(TextSubtype::Password),
        })),
        FieldType::Textarea => Ok(FieldWidget::Text(TextInputProps {
            max_length: descriptor.effective_max_length().unwrap_or_default(),
            keyboard: KeyboardHint::Default,
            multiline: true,
            resizable: false,
            secure: false,
        })),
        FieldType::Select => {
            let mut field = SelectField::new(AutocompleteSelector::from_descriptor(descriptor));
            if let Some(initial) = initial_selection(descriptor) {
                debug!(
                    "Select '{}' starts with default '{}'",
                    descriptor.name, initial.value
                );
                field.handle_autocomplete_select(Some(initial));
            }
            Ok(FieldWidget::Select(field))
        }
        FieldType::Unsupported(other) => Err(DispatchError::UnsupportedType {
            name: descriptor.name.clone(),
            field_type: other.clone(),
        }),
    }
}

/// The selection a select's `default` stands for.
///
/// Static options show the matching option's text; user and channel
/// defaults only carry an id, which is shown as-is.
fn initial_selection(descriptor: &FieldDescriptor) -> Option<SelectedOption> {
    let value = match descriptor.default_value()? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    match descriptor.data_source() {
        DataSource::Custom => descriptor
            .options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| SelectedOption {
                text: o.text.clone(),
                value: o.value.clone(),
            }),
        DataSource::Users | DataSource::Channels => Some(SelectedOption {
            text: value.clone(),
            value,
        }),
    }
}
