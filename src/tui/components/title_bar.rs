//! # TitleBar Component
//!
//! Top status bar showing the dialog title and the latest status message.
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state.
//!
//! 1. **Status message**: `"Create Ticket | Submitting..."`
//! 2. **Default**: `"Create Ticket"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Top status bar component showing title and status.
pub struct TitleBar {
    /// Dialog title
    pub title: String,
    /// Status message (e.g., "Submitting...", "Please fix 2 errors")
    pub status_message: String,
    /// Whether a submission is in flight
    pub submitting: bool,
}

impl TitleBar {
    pub fn new(title: String, status_message: String, submitting: bool) -> Self {
        Self {
            title,
            status_message,
            submitting,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];

        if !self.status_message.is_empty() {
            let status_style = if self.submitting {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status_message.clone(), status_style));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new(
            "Create Ticket".to_string(),
            "Submitting...".to_string(),
            true,
        );
        let text = render(&mut title_bar);
        assert!(text.contains("Create Ticket"));
        assert!(text.contains("| Submitting..."));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("Create Ticket".to_string(), String::new(), false);
        let text = render(&mut title_bar);
        assert!(text.contains("Create Ticket"));
        assert!(!text.contains('|'));
    }
}
