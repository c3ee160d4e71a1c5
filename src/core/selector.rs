//! # Autocomplete Selector
//!
//! A field that shows either a prompt or the current selection. Activating
//! it asks the host to show a selection screen; the screen reports back with
//! a record (or nothing, if dismissed).
//!
//! ```text
//!   activate(token) ──▶ ScreenRequest ──▶ host pushes selection screen
//!        ▲                                        │
//!        │ in_flight = Some(token)                │ user picks / dismisses
//!        │                                        ▼
//!   complete(token, record) ◀──────────── SelectionMade action
//!        in_flight = None
//! ```
//!
//! Only one request is in flight per selector. A second activation while one
//! is pending is suppressed; that is the double-activation guard.

use log::debug;

use crate::core::schema::{DataSource, FieldDescriptor, SelectOption};
use crate::core::selection::{
    NameFormatter, SelectedOption, SelectionRecord, SelectionToken, TeammateNameDisplay,
    normalize, reconcile_display,
};

/// Identifier of the selection screen the host should push.
pub const SELECTOR_SCREEN: &str = "autocomplete_selector";
/// Prompt shown when a field has no placeholder.
pub const DEFAULT_SELECT_PROMPT: &str = "Select an option";

/// What the selection screen needs to know: what to list and whom to notify.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorRegistration {
    pub field: String,
    pub token: SelectionToken,
    pub data_source: DataSource,
    pub options: Vec<SelectOption>,
}

/// A request for the host to navigate to the selection screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRequest {
    pub screen: &'static str,
    pub title: String,
    pub registration: SelectorRegistration,
}

#[derive(Debug, Clone)]
pub struct AutocompleteSelector {
    pub field: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub data_source: DataSource,
    pub options: Vec<SelectOption>,
    selected_text: Option<String>,
    last_seen: Option<SelectedOption>,
    in_flight: Option<SelectionToken>,
}

impl AutocompleteSelector {
    pub fn new(
        field: String,
        label: Option<String>,
        placeholder: Option<String>,
        data_source: DataSource,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            field,
            label,
            placeholder,
            data_source,
            options,
            selected_text: None,
            last_seen: None,
            in_flight: None,
        }
    }

    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        Self::new(
            descriptor.name.clone(),
            Some(descriptor.display_name.clone()).filter(|l| !l.is_empty()),
            descriptor.placeholder().map(str::to_string),
            descriptor.data_source(),
            descriptor.options().to_vec(),
        )
    }

    /// Placeholder, or the generic prompt.
    pub fn prompt(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_SELECT_PROMPT)
    }

    /// What the field shows right now.
    pub fn display_text(&self) -> &str {
        self.selected_text.as_deref().unwrap_or_else(|| self.prompt())
    }

    pub fn has_selection(&self) -> bool {
        self.selected_text.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Request the selection screen. Returns `None` while a request is pending.
    pub fn activate(&mut self, token: SelectionToken) -> Option<ScreenRequest> {
        if let Some(pending) = self.in_flight {
            debug!(
                "Selector '{}' already waiting on {:?}, ignoring activation",
                self.field, pending
            );
            return None;
        }
        self.in_flight = Some(token);

        Some(ScreenRequest {
            screen: SELECTOR_SCREEN,
            title: self.prompt().to_string(),
            registration: SelectorRegistration {
                field: self.field.clone(),
                token,
                data_source: self.data_source,
                options: self.options.clone(),
            },
        })
    }

    /// Handle the selection screen's answer.
    ///
    /// Stale tokens and dismissals (`None`) leave the display untouched.
    /// Returns the normalized pair for a real selection.
    pub fn complete(
        &mut self,
        token: SelectionToken,
        record: Option<&SelectionRecord>,
        setting: TeammateNameDisplay,
        formatter: NameFormatter,
    ) -> Option<SelectedOption> {
        if self.in_flight != Some(token) {
            debug!(
                "Selector '{}' dropping completion for stale {:?}",
                self.field, token
            );
            return None;
        }
        self.in_flight = None;

        let record = record?;
        let selected = normalize(self.data_source, record, setting, formatter);
        self.selected_text = Some(selected.text.clone());
        Some(selected)
    }

    /// Reconcile the display text with an externally held selection.
    pub fn sync_selected(&mut self, selected: Option<&SelectedOption>) {
        self.selected_text = reconcile_display(
            self.last_seen.as_ref(),
            selected,
            self.selected_text.as_deref(),
        );
        if let Some(selected) = selected {
            self.last_seen = Some(selected.clone());
        }
    }

    /// Drop any pending request; a later completion is ignored.
    pub fn teardown(&mut self) {
        self.in_flight = None;
    }
}
