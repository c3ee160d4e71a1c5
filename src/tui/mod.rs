//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the dialog,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! `update()` answers every action with an `Effect`. This module performs
//! them: `PushScreen` opens the selector overlay, `SpawnSubmit` and
//! `SpawnCancelNotification` run the submitter on a tokio task whose result
//! comes back over an mpsc channel as another `Action`, and `Close`/`Quit`
//! end the loop.
//!
//! ## Redraw Strategy
//!
//! Draws only after an event or a background action. While a submission is
//! in flight the poll timeout drops so its result shows up promptly.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use serde_json::Value;

use crate::core::action::{Action, Effect, update};
use crate::core::directory::Directory;
use crate::core::field::FieldWidget;
use crate::core::selector::{SELECTOR_SCREEN, ScreenRequest};
use crate::core::state::Dialog;
use crate::submit::{DialogSubmission, DialogSubmitter, SubmitError, SubmitOutcome};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    FormViewState, SelectorEvent, SelectorScreenState, TextEditor, TextInput, TextInputEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How the dialog ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Submitted,
    Cancelled,
    Quit,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub form: FormViewState,
    pub editor: TextEditor,
    // Selector overlay (None = hidden)
    pub selector_screen: Option<SelectorScreenState>,
    /// Candidates for user and channel selects
    pub directory: Directory,
}

impl TuiState {
    pub fn new(directory: Directory) -> Self {
        Self {
            form: FormViewState::new(),
            editor: TextEditor::default(),
            selector_screen: None,
            directory,
        }
    }

    /// Move focus and park the cursor at the end of the new field's value.
    pub fn focus(&mut self, index: usize, dialog: &Dialog) {
        self.form.set_focus(index);
        let value = dialog
            .fields
            .get(index)
            .map(|f| dialog.form.values.text(f.name()))
            .unwrap_or_default();
        self.editor = TextEditor::at_end(&value);
    }

    pub fn open_selector(&mut self, request: ScreenRequest, dialog: &Dialog) {
        if request.screen != SELECTOR_SCREEN {
            warn!("Unknown screen '{}' requested", request.screen);
            return;
        }
        self.selector_screen = Some(SelectorScreenState::open(
            request,
            &self.directory,
            dialog.name_display,
            dialog.name_formatter,
        ));
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Hide, // Fields draw their own cursor cell
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Show
        );
    }
}

/// Whether the event loop keeps going.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit(ExitReason),
}

pub fn run(
    mut dialog: Dialog,
    submitter: Arc<dyn DialogSubmitter>,
    directory: Directory,
) -> std::io::Result<ExitReason> {
    info!(
        "Showing dialog '{}' with {} field(s), submitting via {}",
        dialog.title(),
        dialog.fields.len(),
        submitter.name()
    );
    let mut tui = TuiState::new(directory);
    tui.focus(0, &dialog);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true; // Force first frame

    let reason = 'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &dialog, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if dialog.form.submitting || dialog.closed {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&event, &dialog, &mut tui) else {
                continue;
            };
            if let Flow::Exit(reason) =
                handle_action(action, &mut dialog, &mut tui, &submitter, &tx)
            {
                break 'main reason;
            }
        }

        // Handle background task actions (submission results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if let Flow::Exit(reason) =
                handle_action(action, &mut dialog, &mut tui, &submitter, &tx)
            {
                break 'main reason;
            }
        }
    };

    ratatui::restore();
    info!("Dialog ended: {:?}", reason);
    Ok(reason)
}

/// Translate a terminal event into the action it stands for.
///
/// Focus, scrolling and cursor movement are handled here directly; only
/// changes the core cares about become actions.
fn route_event(event: &TuiEvent, dialog: &Dialog, tui: &mut TuiState) -> Option<Action> {
    // ForceQuit (Ctrl+C) always quits
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    if matches!(event, TuiEvent::Resize) {
        return None;
    }

    // When the selector is open, route all events to it
    if let Some(selector) = tui.selector_screen.as_mut() {
        let answer = selector.handle_event(event)?;
        let registration = selector.registration.clone();
        tui.selector_screen = None;
        let record = match answer {
            SelectorEvent::Select(record) => Some(record),
            SelectorEvent::Dismiss => None,
        };
        return Some(Action::SelectionMade {
            name: registration.field,
            token: registration.token,
            record,
        });
    }

    // Scroll events always go to the form
    if matches!(
        event,
        TuiEvent::ScrollUp | TuiEvent::ScrollDown | TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown
    ) {
        tui.form.handle_event(event);
        return None;
    }

    if dialog.closed || dialog.form.submitting {
        return None;
    }

    let count = dialog.fields.len();
    match event {
        TuiEvent::Submit => return Some(Action::Submit),
        TuiEvent::Escape => return Some(Action::Cancel),
        TuiEvent::NextField | TuiEvent::CursorDown => {
            tui.form.focus_next(count);
            tui.focus(tui.form.focused, dialog);
            return None;
        }
        TuiEvent::PrevField | TuiEvent::CursorUp => {
            tui.form.focus_prev(count);
            tui.focus(tui.form.focused, dialog);
            return None;
        }
        _ => {}
    }

    let field = dialog.fields.get(tui.form.focused)?;
    match &field.widget {
        Ok(FieldWidget::Select(_)) => match event {
            TuiEvent::Enter | TuiEvent::InputChar(' ') => Some(Action::OpenSelector {
                name: field.name().to_string(),
            }),
            _ => None,
        },
        Ok(FieldWidget::Text(props)) => {
            if matches!(event, TuiEvent::Enter) && !props.multiline {
                tui.form.focus_next(count);
                tui.focus(tui.form.focused, dialog);
                return None;
            }
            let value = dialog.form.values.text(field.name());
            match TextInput::new(&mut tui.editor, &value, props).handle_event(event)? {
                TextInputEvent::Changed(next) => Some(Action::FieldChanged {
                    name: field.name().to_string(),
                    value: Value::String(next),
                }),
                TextInputEvent::CursorMoved => None,
            }
        }
        Err(_) => None,
    }
}

/// Run an action through `update` and perform the resulting effect.
fn handle_action(
    action: Action,
    dialog: &mut Dialog,
    tui: &mut TuiState,
    submitter: &Arc<dyn DialogSubmitter>,
    tx: &mpsc::Sender<Action>,
) -> Flow {
    let closes_as = match action {
        Action::SubmitFinished(_) => ExitReason::Submitted,
        Action::Quit => ExitReason::Quit,
        _ => ExitReason::Cancelled,
    };
    let may_add_errors = matches!(action, Action::Submit | Action::SubmitFinished(_));

    let effect = update(dialog, action);

    if may_add_errors && let Some(index) = dialog.first_error_index() {
        tui.focus(index, dialog);
    }

    match effect {
        Effect::None => Flow::Continue,
        Effect::PushScreen(request) => {
            tui.open_selector(request, dialog);
            Flow::Continue
        }
        Effect::SpawnSubmit(submission) => {
            spawn_submission(submitter.clone(), submission, tx.clone(), Action::SubmitFinished);
            Flow::Continue
        }
        Effect::SpawnCancelNotification(submission) => {
            tui.selector_screen = None;
            spawn_submission(submitter.clone(), submission, tx.clone(), Action::CancelNotified);
            Flow::Continue
        }
        Effect::Close => Flow::Exit(closes_as),
        Effect::Quit => Flow::Exit(ExitReason::Quit),
    }
}

fn spawn_submission(
    submitter: Arc<dyn DialogSubmitter>,
    submission: DialogSubmission,
    tx: mpsc::Sender<Action>,
    wrap: fn(Result<SubmitOutcome, SubmitError>) -> Action,
) {
    info!(
        "Spawning {} to {} (callback_id={})",
        if submission.cancelled {
            "cancel notification"
        } else {
            "submission"
        },
        submission.url,
        submission.callback_id
    );
    tokio::spawn(async move {
        let result = submitter.submit(&submission).await;
        if tx.send(wrap(result)).is_err() {
            warn!("Failed to send submission result: receiver dropped");
        }
    });
}
