//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::directory::{ChannelRecord, Directory, UserRecord};
use crate::core::schema::{
    DataSource, DialogDefinition, DialogRequest, FieldDescriptor, FieldType, SelectOption,
};
use crate::core::selection::TeammateNameDisplay;
use crate::core::state::Dialog;
use crate::submit::{DialogSubmission, DialogSubmitter, SubmitError, SubmitOutcome};

/// A required single-line text field.
pub fn text_field(name: &str, default: Option<&str>) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        field_type: FieldType::Text,
        subtype: None,
        placeholder: None,
        help_text: None,
        optional: false,
        min_length: None,
        max_length: None,
        data_source: None,
        options: None,
        default: default.map(|d| Value::String(d.to_string())),
    }
}

/// A required select. Static selects get High/Medium/Low (p1/p2/p3).
pub fn select_field(name: &str, data_source: DataSource, default: Option<&str>) -> FieldDescriptor {
    let options = (data_source == DataSource::Custom).then(|| {
        [("High", "p1"), ("Medium", "p2"), ("Low", "p3")]
            .into_iter()
            .map(|(text, value)| SelectOption {
                text: text.to_string(),
                value: value.to_string(),
            })
            .collect()
    });
    FieldDescriptor {
        field_type: FieldType::Select,
        data_source: Some(data_source),
        options,
        ..text_field(name, default)
    }
}

pub fn test_request(elements: Vec<FieldDescriptor>) -> DialogRequest {
    DialogRequest {
        url: "http://localhost:9/hooks/dialog".to_string(),
        trigger_id: None,
        dialog: DialogDefinition {
            callback_id: Some("cb-1".to_string()),
            title: "Test Dialog".to_string(),
            icon_url: None,
            elements,
            submit_label: None,
            notify_on_cancel: false,
            state: Some("state-1".to_string()),
        },
    }
}

pub fn test_dialog(elements: Vec<FieldDescriptor>) -> Dialog {
    Dialog::new(test_request(elements), TeammateNameDisplay::Username)
}

pub fn test_directory() -> Directory {
    Directory::new(
        vec![
            UserRecord {
                id: "u1".to_string(),
                username: "jdoe".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                nickname: String::new(),
            },
            UserRecord {
                id: "u2".to_string(),
                username: "bsmith".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Smith".to_string(),
                nickname: "Bobby".to_string(),
            },
        ],
        vec![
            ChannelRecord {
                id: "42".to_string(),
                name: "town-square".to_string(),
                display_name: "Town Square".to_string(),
            },
            ChannelRecord {
                id: "43".to_string(),
                name: "off-topic".to_string(),
                display_name: "Off-Topic".to_string(),
            },
        ],
    )
}

/// Records every submission and answers with a fixed outcome.
pub struct RecordingSubmitter {
    pub outcome: Result<SubmitOutcome, SubmitError>,
    pub received: Mutex<Vec<DialogSubmission>>,
}

impl RecordingSubmitter {
    pub fn new(outcome: Result<SubmitOutcome, SubmitError>) -> Self {
        Self {
            outcome,
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DialogSubmitter for RecordingSubmitter {
    fn name(&self) -> &str {
        "recording"
    }

    async fn submit(&self, submission: &DialogSubmission) -> Result<SubmitOutcome, SubmitError> {
        self.received
            .lock()
            .expect("recording submitter mutex poisoned")
            .push(submission.clone());
        self.outcome.clone()
    }
}
