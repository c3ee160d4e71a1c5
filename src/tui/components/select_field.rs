//! # SelectField Component
//!
//! Renders a `select` element as a one-line box showing either the current
//! selection or the selector's prompt. Enter on a focused select opens the
//! selection screen; this component only draws.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::field::SelectField;
use crate::core::schema::FieldDescriptor;
use crate::tui::components::{note_lines, pad_to_width, truncate_str};

const CHEVRON: &str = " ▾";

/// Stateless render wrapper for one select element.
pub struct SelectFieldView<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub field: &'a SelectField,
    pub error: Option<&'a str>,
    pub focused: bool,
}

impl<'a> SelectFieldView<'a> {
    /// Label + 3-line box + help + error.
    pub fn calculate_height(descriptor: &FieldDescriptor, error: Option<&str>, width: u16) -> u16 {
        4 + note_lines(descriptor.help_text(), width) + note_lines(error, width)
    }
}

impl<'a> Widget for SelectFieldView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let mut y = area.y;

        let label_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let mut label = vec![Span::styled(
            self.descriptor.display_name.clone(),
            label_style,
        )];
        if self.descriptor.optional {
            label.push(Span::styled(
                " (optional)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Paragraph::new(Line::from(label)).render(Rect::new(area.x, y, area.width, 1), buf);
        y += 1;

        let selector = &self.field.selector;
        let border_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if selector.has_selection() {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };

        // Leave room for the chevron inside the borders
        let text_width = (area.width as usize).saturating_sub(2 + CHEVRON.width());
        let padded = pad_to_width(&truncate_str(selector.display_text(), text_width), text_width);

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        if selector.is_pending() {
            block = block.title_bottom(Line::from(" choosing... ").right_aligned());
        }

        let box_height = 3.min(area.bottom().saturating_sub(y));
        Paragraph::new(Line::from(vec![
            Span::styled(padded, text_style),
            Span::styled(CHEVRON, Style::default().fg(Color::DarkGray)),
        ]))
        .block(block)
        .render(Rect::new(area.x, y, area.width, box_height), buf);
        y += box_height;

        if let Some(help) = self.descriptor.help_text() {
            let lines = note_lines(Some(help), area.width).min(area.bottom().saturating_sub(y));
            Paragraph::new(help.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .render(Rect::new(area.x, y, area.width, lines), buf);
            y += lines;
        }

        if let Some(error) = self.error {
            let lines = note_lines(Some(error), area.width).min(area.bottom().saturating_sub(y));
            Paragraph::new(error.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(Rect::new(area.x, y, area.width, lines), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldWidget, dispatch};
    use crate::core::schema::{DataSource, SelectOption};
    use crate::test_support::select_field;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn dispatched(descriptor: &FieldDescriptor) -> SelectField {
        match dispatch(descriptor) {
            Ok(FieldWidget::Select(field)) => field,
            other => panic!("expected select, got {other:?}"),
        }
    }

    fn render(view: SelectFieldView<'_>, height: u16) -> String {
        let backend = TestBackend::new(40, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(view, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_shows_prompt_without_selection() {
        let descriptor = select_field("prio", DataSource::Custom, None);
        let field = dispatched(&descriptor);
        let text = render(
            SelectFieldView {
                descriptor: &descriptor,
                field: &field,
                error: None,
                focused: false,
            },
            4,
        );
        assert!(text.contains("PRIO"));
        assert!(text.contains("Select an option"));
        assert!(text.contains("▾"));
    }

    #[test]
    fn test_shows_default_selection_and_error() {
        let descriptor = select_field("prio", DataSource::Custom, Some("p2"));
        let field = dispatched(&descriptor);
        let text = render(
            SelectFieldView {
                descriptor: &descriptor,
                field: &field,
                error: Some("Bad choice"),
                focused: true,
            },
            5,
        );
        assert!(text.contains("Medium"));
        assert!(!text.contains("Select an option"));
        assert!(text.contains("Bad choice"));
    }

    #[test]
    fn test_wide_label_keeps_chevron() {
        let mut descriptor = select_field("chan", DataSource::Custom, Some("jp"));
        descriptor.options = Some(vec![SelectOption {
            text: "日本語のチャンネル名前です長い".to_string(),
            value: "jp".to_string(),
        }]);
        let field = dispatched(&descriptor);
        let text = render(
            SelectFieldView {
                descriptor: &descriptor,
                field: &field,
                error: None,
                focused: false,
            },
            4,
        );
        assert!(text.contains("日"));
        assert!(text.contains("▾"));
    }

    #[test]
    fn test_height_counts_help_and_error() {
        let mut descriptor = select_field("prio", DataSource::Custom, None);
        assert_eq!(SelectFieldView::calculate_height(&descriptor, None, 40), 4);
        descriptor.help_text = Some("Pick one".to_string());
        assert_eq!(
            SelectFieldView::calculate_height(&descriptor, Some("Required"), 40),
            6
        );
    }
}
