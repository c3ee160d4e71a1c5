//! # Dialog State
//!
//! Core business state for one open dialog. No terminal types here;
//! focus, scrolling and overlays live in the `tui` module.
//!
//! ```text
//! Dialog
//! ├── url: String                       // where submissions go
//! ├── definition: DialogDefinition      // title, callback_id, state, elements
//! ├── fields: Vec<DialogField>          // descriptor + dispatched widget, in schema order
//! ├── form: FormState                   // values, errors, submitting
//! ├── status_message: String            // status bar text
//! ├── error: Option<String>             // dialog-wide error (server or transport)
//! ├── closed: bool                      // no further edits/selections accepted
//! ├── name_display: TeammateNameDisplay // how user selections are labelled
//! └── name_formatter: NameFormatter     // injected user formatting rule
//! ```
//!
//! State changes only happen through `update(dialog, action)` in action.rs.

use log::warn;

use crate::core::field::{DispatchError, FieldWidget, dispatch};
use crate::core::form::{FieldErrors, FormState, FormValues};
use crate::core::schema::{DialogDefinition, DialogRequest, FieldDescriptor};
use crate::core::selection::{
    NameFormatter, SelectionToken, TeammateNameDisplay, display_username,
};
use crate::submit::DialogSubmission;

/// One element of the dialog with the widget it dispatched to.
#[derive(Debug, Clone)]
pub struct DialogField {
    pub descriptor: FieldDescriptor,
    pub widget: Result<FieldWidget, DispatchError>,
}

impl DialogField {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

pub struct Dialog {
    pub url: String,
    pub definition: DialogDefinition,
    pub fields: Vec<DialogField>,
    pub form: FormState,
    pub status_message: String,
    pub error: Option<String>,
    pub closed: bool,
    pub name_display: TeammateNameDisplay,
    pub name_formatter: NameFormatter,
    next_token: u64,
}

impl Dialog {
    pub fn new(request: DialogRequest, name_display: TeammateNameDisplay) -> Self {
        let DialogRequest { url, dialog, .. } = request;

        let fields: Vec<DialogField> = dialog
            .elements
            .iter()
            .map(|descriptor| {
                let widget = dispatch(descriptor);
                if let Err(e) = &widget {
                    warn!("{}", e);
                }
                DialogField {
                    descriptor: descriptor.clone(),
                    widget,
                }
            })
            .collect();

        Self {
            url,
            form: FormState::new(&dialog.elements),
            definition: dialog,
            fields,
            status_message: String::new(),
            error: None,
            closed: false,
            name_display,
            name_formatter: display_username,
            next_token: 0,
        }
    }

    /// Replace the user formatting rule.
    pub fn with_name_formatter(mut self, formatter: NameFormatter) -> Self {
        self.name_formatter = formatter;
        self
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }

    pub fn field(&self, name: &str) -> Option<&DialogField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut DialogField> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.form.errors.get(name).map(String::as_str)
    }

    /// Schema index of the first field with an error.
    pub fn first_error_index(&self) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| self.form.errors.contains_key(f.name()))
    }

    /// Allocate a token for a new selection request.
    pub fn next_token(&mut self) -> SelectionToken {
        self.next_token += 1;
        SelectionToken(self.next_token)
    }

    /// Build the request body. Cancellations carry no values.
    pub fn submission(&self, cancelled: bool) -> DialogSubmission {
        DialogSubmission {
            url: self.url.clone(),
            callback_id: self.definition.callback_id.clone().unwrap_or_default(),
            state: self.definition.state.clone().unwrap_or_default(),
            submission: if cancelled {
                FormValues::default()
            } else {
                self.form.values.clone()
            },
            cancelled,
        }
    }

    /// Split server errors into ones this dialog can show inline and the rest.
    pub fn partition_errors(&self, errors: FieldErrors) -> (FieldErrors, FieldErrors) {
        errors
            .into_iter()
            .partition(|(name, _)| self.field(name).is_some())
    }

    /// Stop accepting input and release every pending selection.
    pub fn close(&mut self) {
        self.closed = true;
        for field in &mut self.fields {
            if let Ok(FieldWidget::Select(select)) = &mut field.widget {
                select.selector.teardown();
            }
        }
    }
}
