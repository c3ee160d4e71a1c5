//! # Dialog Schema
//!
//! Server-supplied description of an interactive dialog: where to submit,
//! what to call it, and the ordered list of fields to render.
//!
//! ```text
//! DialogRequest
//! ├── url: String                 // integration endpoint
//! ├── trigger_id: Option<String>
//! └── dialog: DialogDefinition
//!     ├── callback_id / state     // echoed back on submit
//!     ├── title / submit_label
//!     ├── notify_on_cancel
//!     └── elements: Vec<FieldDescriptor>
//! ```
//!
//! Servers send zero for unset integers and empty strings for unset text,
//! so the accessors here treat `0` and `""` the same as "absent".

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

/// Default `max_length` for single-line text fields.
pub const TEXT_DEFAULT_MAX_LENGTH: usize = 150;
/// Default `max_length` for textarea fields.
pub const TEXTAREA_DEFAULT_MAX_LENGTH: usize = 3000;
/// Label used when the dialog doesn't provide one.
pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";

// ============================================================================
// Field Types
// ============================================================================

/// Which leaf widget a field renders as.
///
/// Unknown type strings are kept as `Unsupported` so a single bad element
/// doesn't prevent the rest of the dialog from loading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Unsupported(String),
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            _ => FieldType::Unsupported(s),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Textarea => write!(f, "textarea"),
            FieldType::Select => write!(f, "select"),
            FieldType::Unsupported(other) => write!(f, "{other}"),
        }
    }
}

/// Input hint for text fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TextSubtype {
    Email,
    Number,
    Tel,
    Url,
    Password,
    Other(String),
}

impl From<String> for TextSubtype {
    fn from(s: String) -> Self {
        match s.as_str() {
            "email" => TextSubtype::Email,
            "number" => TextSubtype::Number,
            "tel" => TextSubtype::Tel,
            "url" => TextSubtype::Url,
            "password" => TextSubtype::Password,
            _ => TextSubtype::Other(s),
        }
    }
}

/// Where a select field's options come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DataSource {
    Users,
    Channels,
    /// Static `options` list carried in the schema.
    #[default]
    Custom,
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "users" => DataSource::Users,
            "channels" => DataSource::Channels,
            _ => DataSource::Custom,
        }
    }
}

/// One entry of a static option list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// A single dialog element as sent by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub subtype: Option<TextSubtype>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    pub fn placeholder(&self) -> Option<&str> {
        non_empty(self.placeholder.as_deref())
    }

    pub fn help_text(&self) -> Option<&str> {
        non_empty(self.help_text.as_deref())
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length.filter(|n| *n > 0)
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length.filter(|n| *n > 0)
    }

    /// Declared `max_length`, or the per-type default for text fields.
    pub fn effective_max_length(&self) -> Option<usize> {
        match self.field_type {
            FieldType::Text => Some(self.max_length().unwrap_or(TEXT_DEFAULT_MAX_LENGTH)),
            FieldType::Textarea => {
                Some(self.max_length().unwrap_or(TEXTAREA_DEFAULT_MAX_LENGTH))
            }
            _ => self.max_length(),
        }
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source.unwrap_or_default()
    }

    pub fn options(&self) -> &[SelectOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// The schema default, with `null` and `""` collapsed to `None`.
    pub fn default_value(&self) -> Option<&Value> {
        self.default
            .as_ref()
            .filter(|v| !v.is_null() && v.as_str() != Some(""))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Dialog Definition
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DialogDefinition {
    #[serde(default)]
    pub callback_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub elements: Vec<FieldDescriptor>,
    #[serde(default)]
    pub submit_label: Option<String>,
    #[serde(default)]
    pub notify_on_cancel: bool,
    #[serde(default)]
    pub state: Option<String>,
}

impl DialogDefinition {
    pub fn submit_label(&self) -> &str {
        non_empty(self.submit_label.as_deref()).unwrap_or(DEFAULT_SUBMIT_LABEL)
    }

    pub fn element(&self, name: &str) -> Option<&FieldDescriptor> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Checks the structural invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.title.trim().is_empty() {
            return Err(SchemaError::MissingTitle);
        }
        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.name.as_str()) {
                return Err(SchemaError::DuplicateName(element.name.clone()));
            }
        }
        Ok(())
    }
}

/// The envelope a dialog arrives in.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogRequest {
    pub url: String,
    #[serde(default)]
    pub trigger_id: Option<String>,
    pub dialog: DialogDefinition,
}

impl DialogRequest {
    /// Parse and validate a dialog request from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let request: DialogRequest = serde_json::from_str(json).map_err(SchemaError::Parse)?;
        if request.url.trim().is_empty() {
            return Err(SchemaError::MissingUrl);
        }
        request.dialog.validate()?;
        debug!(
            "Parsed dialog '{}' with {} elements",
            request.dialog.title,
            request.dialog.elements.len()
        );
        Ok(request)
    }
}

/// Load a dialog request from a JSON file.
pub fn load_dialog(path: &Path) -> Result<DialogRequest, SchemaError> {
    let contents = fs::read_to_string(path).map_err(SchemaError::Io)?;
    let request = DialogRequest::from_json(&contents)?;
    info!("Loaded dialog from {}", path.display());
    Ok(request)
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum SchemaError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    MissingUrl,
    MissingTitle,
    DuplicateName(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Io(e) => write!(f, "dialog I/O error: {e}"),
            SchemaError::Parse(e) => write!(f, "dialog parse error: {e}"),
            SchemaError::MissingUrl => write!(f, "dialog has no submission url"),
            SchemaError::MissingTitle => write!(f, "dialog has no title"),
            SchemaError::DuplicateName(name) => {
                write!(f, "dialog element name '{name}' is used more than once")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "url": "https://example.com/hooks/dialog",
        "trigger_id": "trigger-1",
        "dialog": {
            "callback_id": "cb-1",
            "title": "Report Incident",
            "state": "opaque",
            "notify_on_cancel": true,
            "elements": [
                {"name": "summary", "display_name": "Summary", "type": "text", "subtype": "email", "max_length": 0},
                {"name": "details", "display_name": "Details", "type": "textarea", "optional": true},
                {"name": "owner", "display_name": "Owner", "type": "select", "data_source": "users"},
                {"name": "weird", "display_name": "Weird", "type": "bool"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_full_request() {
        let request = DialogRequest::from_json(SAMPLE).unwrap();
        assert_eq!(request.url, "https://example.com/hooks/dialog");
        assert_eq!(request.trigger_id.as_deref(), Some("trigger-1"));
        let dialog = &request.dialog;
        assert_eq!(dialog.callback_id.as_deref(), Some("cb-1"));
        assert!(dialog.notify_on_cancel);
        assert_eq!(dialog.elements.len(), 4);
        assert_eq!(dialog.elements[0].subtype, Some(TextSubtype::Email));
        assert_eq!(dialog.elements[2].data_source(), DataSource::Users);
        assert_eq!(
            dialog.elements[3].field_type,
            FieldType::Unsupported("bool".to_string())
        );
    }

    #[test]
    fn test_zero_max_length_uses_type_default() {
        let request = DialogRequest::from_json(SAMPLE).unwrap();
        let summary = &request.dialog.elements[0];
        assert_eq!(summary.max_length(), None);
        assert_eq!(summary.effective_max_length(), Some(TEXT_DEFAULT_MAX_LENGTH));
        let details = &request.dialog.elements[1];
        assert_eq!(
            details.effective_max_length(),
            Some(TEXTAREA_DEFAULT_MAX_LENGTH)
        );
    }

    #[test]
    fn test_submit_label_defaults() {
        let request = DialogRequest::from_json(SAMPLE).unwrap();
        assert_eq!(request.dialog.submit_label(), "Submit");
    }

    #[test]
    fn test_unknown_data_source_is_custom() {
        assert_eq!(DataSource::from("dynamic".to_string()), DataSource::Custom);
        assert_eq!(DataSource::from("channels".to_string()), DataSource::Channels);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"{"url": "http://x", "dialog": {"title": "T", "elements": [
            {"name": "a", "display_name": "A", "type": "text"},
            {"name": "a", "display_name": "A again", "type": "textarea"}
        ]}}"#;
        match DialogRequest::from_json(json) {
            Err(SchemaError::DuplicateName(name)) => assert_eq!(name, "a"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_url_rejected() {
        let json = r#"{"url": " ", "dialog": {"title": "T"}}"#;
        assert!(matches!(
            DialogRequest::from_json(json),
            Err(SchemaError::MissingUrl)
        ));
    }

    #[test]
    fn test_empty_title_rejected() {
        let json = r#"{"url": "http://x", "dialog": {"title": ""}}"#;
        assert!(matches!(
            DialogRequest::from_json(json),
            Err(SchemaError::MissingTitle)
        ));
    }

    #[test]
    fn test_null_default_is_absent() {
        let json = r#"{"name": "a", "display_name": "A", "type": "text", "default": null}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(field.default_value().is_none());
    }

    #[test]
    fn test_empty_string_default_is_absent() {
        let json = r#"{"name": "a", "display_name": "A", "type": "text", "default": ""}"#;
        let field: FieldDescriptor = serde_json::from_str(json).unwrap();
        assert!(field.default_value().is_none());
    }
}
