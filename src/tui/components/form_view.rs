//! # FormView Component
//!
//! Scrollable column of every dialog element, in schema order.
//!
//! `FormView` is a transient component (created each frame) that wraps
//! `&'a mut FormViewState` (focus and scroll) and borrows the core `Dialog`
//! for values, errors and widgets. Heights are recomputed every frame; a
//! dialog has few enough elements that caching buys nothing.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::field::FieldWidget;
use crate::core::state::{Dialog, DialogField};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::select_field::SelectFieldView;
use crate::tui::components::text_field::{TextEditor, TextField};
use crate::tui::event::TuiEvent;

/// Blank rows between fields
const FIELD_SPACING: u16 = 1;
/// Name + reason
const UNSUPPORTED_HEIGHT: u16 = 2;

/// Focus and scroll state for the form.
/// Must be persisted in the parent TuiState.
pub struct FormViewState {
    pub scroll_state: ScrollViewState,
    /// Index of the focused field
    pub focused: usize,
    /// Per-field heights from the last render, spacing included
    pub heights: Vec<u16>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// When true, the next render scrolls the focused field into view
    pub follow_focus: bool,
}

impl Default for FormViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            focused: 0,
            heights: Vec::new(),
            viewport_height: 0,
            follow_focus: true,
        }
    }

    /// Move focus forward, wrapping at the end.
    pub fn focus_next(&mut self, field_count: usize) {
        if field_count > 0 {
            self.set_focus((self.focused + 1) % field_count);
        }
    }

    /// Move focus back, wrapping at the start.
    pub fn focus_prev(&mut self, field_count: usize) {
        if field_count > 0 {
            self.set_focus((self.focused + field_count - 1) % field_count);
        }
    }

    pub fn set_focus(&mut self, index: usize) {
        self.focused = index;
        self.follow_focus = true;
    }

    /// Scroll so the focused field is fully visible.
    /// If it is taller than the viewport, align its top edge.
    pub fn scroll_to_focused(&mut self) {
        if self.focused >= self.heights.len() {
            return;
        }
        let top: u16 = self.heights[..self.focused].iter().sum();
        let bottom = top + self.heights[self.focused].saturating_sub(FIELD_SPACING);
        let offset_y = self.scroll_state.offset().y;

        if top < offset_y || bottom.saturating_sub(top) > self.viewport_height {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let total: u16 = self.heights.iter().sum();
        let max_y = total.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrolling is handled on the state: it must survive between frames.
impl EventHandler for FormViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.follow_focus = false;
        self.clamp_scroll();
        None
    }
}

/// Scrollable form component.
/// Created fresh each frame with references to state and data.
pub struct FormView<'a> {
    pub state: &'a mut FormViewState,
    pub dialog: &'a Dialog,
    pub editor: &'a mut TextEditor,
}

impl<'a> FormView<'a> {
    pub fn new(
        state: &'a mut FormViewState,
        dialog: &'a Dialog,
        editor: &'a mut TextEditor,
    ) -> Self {
        Self {
            state,
            dialog,
            editor,
        }
    }

    fn field_height(&self, field: &DialogField, width: u16) -> u16 {
        let error = self.dialog.error_for(field.name());
        let height = match &field.widget {
            Ok(FieldWidget::Text(props)) => {
                let value = self.dialog.form.values.text(field.name());
                TextField::calculate_height(&field.descriptor, props, &value, error, width)
            }
            Ok(FieldWidget::Select(_)) => {
                SelectFieldView::calculate_height(&field.descriptor, error, width)
            }
            Err(_) => UNSUPPORTED_HEIGHT,
        };
        height + FIELD_SPACING
    }
}

impl<'a> Component for FormView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        let heights: Vec<u16> = self
            .dialog
            .fields
            .iter()
            .map(|f| self.field_height(f, content_width))
            .collect();
        self.state.heights = heights;
        self.state.viewport_height = area.height;
        if self.state.focused >= self.dialog.fields.len() {
            self.state.focused = self.dialog.fields.len().saturating_sub(1);
        }

        if self.state.follow_focus {
            self.state.scroll_to_focused();
        }
        self.state.clamp_scroll();

        let total_height: u16 = self.state.heights.iter().sum();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height.max(1)))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let values = &self.dialog.form.values;
        let mut y_offset: u16 = 0;
        for (i, field) in self.dialog.fields.iter().enumerate() {
            let height = self.state.heights[i].saturating_sub(FIELD_SPACING);
            let rect = Rect::new(0, y_offset, content_width, height);
            let focused = i == self.state.focused;
            let error = self.dialog.error_for(field.name());

            match &field.widget {
                Ok(FieldWidget::Text(props)) => {
                    let value = values.text(field.name());
                    if focused {
                        self.editor.update_scroll_offset(&value, props, content_width);
                    }
                    scroll_view.render_widget(
                        TextField {
                            descriptor: &field.descriptor,
                            props,
                            value: &value,
                            error,
                            cursor: focused.then_some(self.editor.cursor),
                            scroll_offset: if focused { self.editor.scroll_offset } else { 0 },
                        },
                        rect,
                    );
                }
                Ok(FieldWidget::Select(select)) => {
                    scroll_view.render_widget(
                        SelectFieldView {
                            descriptor: &field.descriptor,
                            field: select,
                            error,
                            focused,
                        },
                        rect,
                    );
                }
                Err(e) => {
                    scroll_view.render_widget(
                        UnsupportedField {
                            label: &field.descriptor.display_name,
                            reason: e.to_string(),
                            focused,
                        },
                        rect,
                    );
                }
            }

            y_offset += self.state.heights[i];
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Placeholder for an element whose type has no widget.
struct UnsupportedField<'a> {
    label: &'a str,
    reason: String,
    focused: bool,
}

impl<'a> Widget for UnsupportedField<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Paragraph::new(vec![
            Line::from(Span::styled(self.label.to_string(), label_style)),
            Line::from(Span::styled(self.reason, Style::default().fg(Color::Red))),
        ])
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{DataSource, FieldType};
    use crate::test_support::{select_field, test_dialog, text_field};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_form(dialog: &Dialog, state: &mut FormViewState, height: u16) -> String {
        let backend = TestBackend::new(50, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut editor = TextEditor::default();
        terminal
            .draw(|f| {
                FormView::new(state, dialog, &mut editor).render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_focus_wraps() {
        let mut state = FormViewState::new();
        state.focus_prev(3);
        assert_eq!(state.focused, 2);
        state.focus_next(3);
        assert_eq!(state.focused, 0);
        state.focus_next(0);
        assert_eq!(state.focused, 0);
    }

    #[test]
    fn test_renders_fields_in_order() {
        let dialog = test_dialog(vec![
            text_field("name", Some("Ada")),
            select_field("prio", DataSource::Custom, Some("p1")),
        ]);
        let mut state = FormViewState::new();
        let text = render_form(&dialog, &mut state, 20);
        let name_at = text.find("NAME").unwrap();
        let prio_at = text.find("PRIO").unwrap();
        assert!(name_at < prio_at);
        assert!(text.contains("Ada"));
        assert!(text.contains("High"));
        assert_eq!(state.heights, vec![5, 5]);
    }

    #[test]
    fn test_unsupported_field_shows_reason() {
        let mut radio = text_field("r", None);
        radio.field_type = FieldType::Unsupported("radio".to_string());
        let dialog = test_dialog(vec![radio, text_field("ok", None)]);
        let mut state = FormViewState::new();
        let text = render_form(&dialog, &mut state, 20);
        assert!(text.contains("unsupported type 'radio'"));
        assert!(text.contains("OK"));
    }

    #[test]
    fn test_focus_scrolls_into_view() {
        let fields = (0..6).map(|i| text_field(&format!("f{i}"), None)).collect();
        let dialog = test_dialog(fields);
        let mut state = FormViewState::new();
        render_form(&dialog, &mut state, 8);
        assert_eq!(state.scroll_state.offset().y, 0);

        state.set_focus(5);
        let text = render_form(&dialog, &mut state, 8);
        assert!(state.scroll_state.offset().y > 0);
        assert!(text.contains("F5"));
    }

    #[test]
    fn test_manual_scroll_releases_focus_follow() {
        let mut state = FormViewState::new();
        state.heights = vec![10, 10];
        state.viewport_height = 5;
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(!state.follow_focus);
        state.set_focus(1);
        assert!(state.follow_focus);
    }
}
