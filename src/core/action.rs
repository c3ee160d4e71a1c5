//! # Actions
//!
//! Everything that can happen to a dialog becomes an `Action`.
//! User types into a field? That's `Action::FieldChanged`.
//! The selection screen answers? That's `Action::SelectionMade`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O the
//! adapter should perform. No side effects here.
//!
//! ```text
//! Dialog + Action  →  update()  →  Dialog' + Effect
//! ```

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::field::FieldWidget;
use crate::core::form::validate;
use crate::core::selection::{SelectionRecord, SelectionToken};
use crate::core::selector::ScreenRequest;
use crate::core::state::Dialog;
use crate::submit::{DialogSubmission, SubmitError, SubmitOutcome};

#[derive(Debug)]
pub enum Action {
    /// A text input produced a new value.
    FieldChanged { name: String, value: Value },
    /// A select field was activated.
    OpenSelector { name: String },
    /// The selection screen answered; `None` means dismissed.
    SelectionMade {
        name: String,
        token: SelectionToken,
        record: Option<SelectionRecord>,
    },
    Submit,
    SubmitFinished(Result<SubmitOutcome, SubmitError>),
    Cancel,
    CancelNotified(Result<SubmitOutcome, SubmitError>),
    Quit,
}

/// I/O requested by `update`, performed by the adapter.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Show the selection screen.
    PushScreen(ScreenRequest),
    SpawnSubmit(DialogSubmission),
    SpawnCancelNotification(DialogSubmission),
    /// The dialog is finished; dismiss it.
    Close,
    Quit,
}

pub fn update(dialog: &mut Dialog, action: Action) -> Effect {
    match action {
        Action::FieldChanged { name, value } => {
            if dialog.closed {
                debug!("Ignoring change to '{}' on closed dialog", name);
                return Effect::None;
            }
            if dialog.field(&name).is_none() {
                warn!("Change for unknown field '{}'", name);
                return Effect::None;
            }
            dialog.form.on_change(&name, value);
            dialog.form.errors.remove(&name);
            Effect::None
        }

        Action::OpenSelector { name } => {
            if dialog.closed {
                return Effect::None;
            }
            let token = dialog.next_token();
            let Some(field) = dialog.field_mut(&name) else {
                warn!("Selector requested for unknown field '{}'", name);
                return Effect::None;
            };
            let Ok(FieldWidget::Select(select)) = &mut field.widget else {
                debug!("Field '{}' is not a select", name);
                return Effect::None;
            };
            match select.selector.activate(token) {
                Some(request) => {
                    info!("Opening selector for '{}' ({:?})", name, token);
                    Effect::PushScreen(request)
                }
                None => Effect::None,
            }
        }

        Action::SelectionMade {
            name,
            token,
            record,
        } => {
            if dialog.closed {
                debug!("Dropping selection for '{}': dialog closed", name);
                return Effect::None;
            }
            let setting = dialog.name_display;
            let formatter = dialog.name_formatter;
            let Some(Ok(FieldWidget::Select(select))) =
                dialog.field_mut(&name).map(|f| &mut f.widget)
            else {
                warn!("Selection for unknown select field '{}'", name);
                return Effect::None;
            };

            let selected = select
                .selector
                .complete(token, record.as_ref(), setting, formatter);
            if let Some(value) = select.handle_autocomplete_select(selected) {
                dialog.form.on_change(&name, value);
                dialog.form.errors.remove(&name);
            }
            Effect::None
        }

        Action::Submit => {
            if dialog.closed || dialog.form.submitting {
                debug!("Submit ignored (closed={}, submitting={})", dialog.closed, dialog.form.submitting);
                return Effect::None;
            }

            let errors = validate(&dialog.definition.elements, &dialog.form.values);
            if !errors.is_empty() {
                info!("Submit blocked by {} validation error(s)", errors.len());
                dialog.status_message = match errors.len() {
                    1 => "Please fix 1 error".to_string(),
                    n => format!("Please fix {n} errors"),
                };
                dialog.form.errors = errors;
                return Effect::None;
            }

            dialog.form.errors.clear();
            dialog.error = None;
            dialog.form.submitting = true;
            dialog.status_message = "Submitting...".to_string();
            Effect::SpawnSubmit(dialog.submission(false))
        }

        Action::SubmitFinished(result) => {
            if !dialog.form.submitting {
                warn!("Submission result arrived with no submission pending");
                return Effect::None;
            }
            dialog.form.submitting = false;

            match result {
                Ok(SubmitOutcome::Accepted) => {
                    info!("Dialog '{}' submitted", dialog.title());
                    dialog.status_message = "Submitted".to_string();
                    dialog.close();
                    Effect::Close
                }
                Ok(SubmitOutcome::Rejected { errors, error }) => {
                    let (known, unknown) = dialog.partition_errors(errors);
                    info!(
                        "Submission rejected: {} field error(s), {} unmatched",
                        known.len(),
                        unknown.len()
                    );
                    dialog.form.errors = known;
                    dialog.error = error.or_else(|| {
                        (!unknown.is_empty()).then(|| {
                            unknown
                                .iter()
                                .map(|(name, msg)| format!("{name}: {msg}"))
                                .collect::<Vec<_>>()
                                .join("; ")
                        })
                    });
                    dialog.status_message = "Submission rejected".to_string();
                    Effect::None
                }
                Err(e) => {
                    warn!("Submission failed: {}", e);
                    dialog.error = Some(format!("Submission failed: {e}"));
                    dialog.status_message = "Submission failed".to_string();
                    Effect::None
                }
            }
        }

        Action::Cancel => {
            if dialog.closed {
                return Effect::None;
            }
            dialog.close();
            if dialog.definition.notify_on_cancel {
                info!("Dialog cancelled, notifying integration");
                dialog.status_message = "Cancelling...".to_string();
                Effect::SpawnCancelNotification(dialog.submission(true))
            } else {
                info!("Dialog cancelled");
                Effect::Close
            }
        }

        Action::CancelNotified(result) => {
            if let Err(e) = result {
                warn!("Cancel notification failed: {}", e);
            }
            Effect::Close
        }

        Action::Quit => {
            dialog.close();
            Effect::Quit
        }
    }
}
