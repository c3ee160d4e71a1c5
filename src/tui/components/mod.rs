//! # TUI Components
//!
//! This module contains all UI components for the dialog screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: dialog title and status
//! - `TextField`: one `text`/`textarea` element
//! - `SelectFieldView`: one `select` element
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `FormView`: scrollable column of all elements, owns focus
//! - `SelectorScreen`: overlay listing the candidates for one select
//! - `TextInput`: editing wrapper around the focused field's cursor
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (Top status bar)
//! ├── form_view.rs        (Scrollable form)
//! ├── select_field.rs     (Select element)
//! ├── selector_screen.rs  (Selection overlay)
//! └── text_field/         (Text element + editing)
//! ```

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

mod title_bar;
pub use title_bar::TitleBar;

pub mod form_view;
pub mod select_field;
pub mod selector_screen;
pub mod text_field;
pub use form_view::{FormView, FormViewState};
pub use select_field::SelectFieldView;
pub use selector_screen::{SelectorEvent, SelectorScreen, SelectorScreenState};
pub use text_field::{TextEditor, TextField, TextInput, TextInputEvent};

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let budget = max_width - 3;
        let mut used = 0;
        let kept: String = s
            .chars()
            .take_while(|c| {
                used += c.width().unwrap_or(0);
                used <= budget
            })
            .collect();
        format!("{kept}...")
    }
}

/// Left-align `s` in a cell `width` columns wide.
pub(crate) fn pad_to_width(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Rows a help or error note needs when wrapped at `width`.
pub(crate) fn note_lines(note: Option<&str>, width: u16) -> u16 {
    match note {
        Some(text) if !text.trim().is_empty() && width > 0 => {
            textwrap::wrap(text, width as usize).len().max(1) as u16
        }
        _ => 0,
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("Town Square", 8), "Town ...");
        assert_eq!(truncate_str("héllo wörld", 6), "hél...");
        assert_eq!(truncate_str("abc", 2), "..");
        // Wide characters count as two columns
        assert_eq!(truncate_str("日本語のチャンネル", 7), "日本...");
    }

    #[test]
    fn test_pad_to_width_counts_columns() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("日本", 6), "日本  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn test_note_lines() {
        assert_eq!(note_lines(None, 20), 0);
        assert_eq!(note_lines(Some("   "), 20), 0);
        assert_eq!(note_lines(Some("short"), 20), 1);
        assert_eq!(note_lines(Some("aaaa bbbb cccc"), 5), 3);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(70, 60, outer);
        assert_eq!(inner.width, 70);
        assert_eq!(inner.height, 30);
        assert_eq!(inner.x, 15);
    }
}
