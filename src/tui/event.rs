use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use log::{debug, warn};
use std::time::Duration;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Dialog-level
    ForceQuit, // Ctrl+C
    Submit,    // Ctrl+S
    Escape,
    Resize,

    // Focus movement
    NextField, // Tab
    PrevField, // Shift+Tab

    // Editing / activation on the focused field
    Enter,
    InputChar(char),
    Newline, // Ctrl+J
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    CursorUp,
    CursorDown,

    // Form scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => translate(ev),
            Err(e) => {
                warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Map a raw crossterm event to a `TuiEvent`.
pub fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => translate_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases too; only presses and repeats count
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(TuiEvent::Submit),
        // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
        (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::Newline),
        (_, KeyCode::BackTab) => Some(TuiEvent::PrevField),
        (_, KeyCode::Tab) => Some(TuiEvent::NextField),
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Enter) => Some(TuiEvent::Enter),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
        (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}
