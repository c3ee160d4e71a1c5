//! # TextField Component
//!
//! Renders a `text` or `textarea` element and turns key presses into new
//! values for it.
//!
//! ## State Management
//!
//! The value is a prop: it lives in the core `FormValues` and comes back
//! fresh every frame. The only local state is the cursor and scroll offset
//! (`TextEditor`), which belong to whichever field has focus.
//!
//! Values are laid out in rows of at most the box's inner width. Once the
//! rows outgrow the box, only a window of them is drawn and the window
//! follows the cursor.
//!
//! Edits never mutate the value directly. `TextInput` computes the new
//! string and emits `TextInputEvent::Changed`; the caller turns that into
//! `Action::FieldChanged`.

mod text_wrap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
    Widget, Wrap,
};
use unicode_width::UnicodeWidthStr;

use crate::core::field::TextInputProps;
use crate::core::schema::FieldDescriptor;
use crate::tui::component::EventHandler;
use crate::tui::components::note_lines;
use crate::tui::event::TuiEvent;

use text_wrap::{
    SINGLE_LINE_MAX_LINES, TEXTAREA_MAX_LINES, TEXTAREA_MIN_LINES, VERTICAL_OVERHEAD,
    clamp_to_boundary, inner_width, next_char_boundary, prev_char_boundary,
};

const MASK_CHAR: char = '•';

/// Cursor and scroll tracking for the focused text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextEditor {
    /// Byte offset into the value
    pub cursor: usize,
    /// First row drawn inside the input box
    pub scroll_offset: u16,
}

impl TextEditor {
    /// Place the cursor after the last character of `value`.
    pub fn at_end(value: &str) -> Self {
        Self {
            cursor: value.len(),
            scroll_offset: 0,
        }
    }

    /// Update scroll offset to keep the cursor row inside the input box.
    pub fn update_scroll_offset(&mut self, value: &str, props: &TextInputProps, content_width: u16) {
        let (shown, cursor) = shown_value(value, props, Some(self.cursor));
        let layout = layout_rows(&shown, cursor, inner_width(content_width), Style::default());
        let total = layout.rows.len() as u16;
        let visible = visible_lines(props, total);

        if total <= visible {
            self.scroll_offset = 0;
            return;
        }

        let cursor_row = layout.cursor_row.unwrap_or(0);
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + visible {
            self.scroll_offset = cursor_row + 1 - visible;
        }
        self.scroll_offset = self.scroll_offset.min(total - visible);
    }
}

/// High-level events emitted by a text input
#[derive(Debug, Clone, PartialEq)]
pub enum TextInputEvent {
    /// The value should become this string.
    Changed(String),
    /// Only the cursor moved.
    CursorMoved,
}

/// Transient editing wrapper around the persistent `TextEditor`.
pub struct TextInput<'a> {
    pub editor: &'a mut TextEditor,
    pub value: &'a str,
    pub props: &'a TextInputProps,
}

impl<'a> TextInput<'a> {
    pub fn new(editor: &'a mut TextEditor, value: &'a str, props: &'a TextInputProps) -> Self {
        Self {
            editor,
            value,
            props,
        }
    }

    /// Insert text at the cursor, dropping characters the keyboard doesn't
    /// offer and anything past `max_length`.
    fn insert(&mut self, text: &str) -> Option<TextInputEvent> {
        let used = self.value.chars().count();
        let capacity = self.props.max_length.saturating_sub(used);

        let accepted: String = text
            .chars()
            .filter(|c| *c != '\r')
            .filter(|c| {
                if *c == '\n' {
                    self.props.multiline
                } else {
                    self.props.keyboard.accepts(*c)
                }
            })
            .take(capacity)
            .collect();

        if accepted.is_empty() {
            return None;
        }

        let pos = clamp_to_boundary(self.value, self.editor.cursor);
        let mut next = String::with_capacity(self.value.len() + accepted.len());
        next.push_str(&self.value[..pos]);
        next.push_str(&accepted);
        next.push_str(&self.value[pos..]);
        self.editor.cursor = pos + accepted.len();
        Some(TextInputEvent::Changed(next))
    }

    fn move_to(&mut self, pos: usize) -> Option<TextInputEvent> {
        (self.editor.cursor != pos).then(|| {
            self.editor.cursor = pos;
            TextInputEvent::CursorMoved
        })
    }
}

impl<'a> EventHandler for TextInput<'a> {
    type Event = TextInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let value = self.value;
        let pos = clamp_to_boundary(value, self.editor.cursor);
        self.editor.cursor = pos;

        match event {
            TuiEvent::InputChar(c) => self.insert(&c.to_string()),
            TuiEvent::Newline | TuiEvent::Enter if self.props.multiline => self.insert("\n"),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace => {
                if pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(value, pos);
                let next = format!("{}{}", &value[..prev], &value[pos..]);
                self.editor.cursor = prev;
                Some(TextInputEvent::Changed(next))
            }
            TuiEvent::Delete => {
                if pos >= value.len() {
                    return None;
                }
                let after = next_char_boundary(value, pos);
                Some(TextInputEvent::Changed(format!(
                    "{}{}",
                    &value[..pos],
                    &value[after..]
                )))
            }
            TuiEvent::CursorLeft if pos > 0 => self.move_to(prev_char_boundary(value, pos)),
            TuiEvent::CursorRight if pos < value.len() => {
                self.move_to(next_char_boundary(value, pos))
            }
            TuiEvent::CursorHome => {
                let line_start = value[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
                self.move_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = value[pos..]
                    .find('\n')
                    .map(|i| pos + i)
                    .unwrap_or(value.len());
                self.move_to(line_end)
            }
            _ => None,
        }
    }
}

/// Stateless render wrapper for one text element.
pub struct TextField<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub props: &'a TextInputProps,
    pub value: &'a str,
    pub error: Option<&'a str>,
    /// Cursor position when focused.
    pub cursor: Option<usize>,
    /// First row to draw, from the focused field's `TextEditor`.
    pub scroll_offset: u16,
}

impl<'a> TextField<'a> {
    /// Height needed to render this field at `width`.
    pub fn calculate_height(
        descriptor: &FieldDescriptor,
        props: &TextInputProps,
        value: &str,
        error: Option<&str>,
        width: u16,
    ) -> u16 {
        let content_lines = content_lines(props, value, width);
        1 + VERTICAL_OVERHEAD
            + content_lines
            + note_lines(descriptor.help_text(), width)
            + note_lines(error, width)
    }

    fn label_line(&self) -> Line<'a> {
        let focused = self.cursor.is_some();
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![Span::styled(self.descriptor.display_name.clone(), label_style)];
        if self.descriptor.optional {
            spans.push(Span::styled(
                " (optional)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(hint) = self.props.keyboard.label() {
            spans.push(Span::styled(
                format!(" [{hint}]"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for TextField<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let focused = self.cursor.is_some();
        let mut y = area.y;

        Paragraph::new(self.label_line()).render(Rect::new(area.x, y, area.width, 1), buf);
        y += 1;

        let content = content_lines(self.props, self.value, area.width);
        let box_height = (content + VERTICAL_OVERHEAD).min(area.bottom().saturating_sub(y));

        let border_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        if focused {
            let count = self.value.chars().count();
            block = block.title_bottom(
                Line::from(format!(" {}/{} ", count, self.props.max_length)).right_aligned(),
            );
        }

        let box_area = Rect::new(area.x, y, area.width, box_height);
        let (shown, display_cursor) = shown_value(self.value, self.props, self.cursor);
        if shown.is_empty() && !focused {
            let placeholder = self.descriptor.placeholder().unwrap_or_default().to_string();
            Paragraph::new(Line::styled(placeholder, Style::default().fg(Color::DarkGray)))
                .block(block)
                .wrap(Wrap { trim: false })
                .render(box_area, buf);
        } else {
            let layout = layout_rows(
                &shown,
                display_cursor,
                inner_width(area.width),
                Style::default(),
            );
            let total = layout.rows.len() as u16;
            let visible = box_height.saturating_sub(VERTICAL_OVERHEAD);
            let start = self.scroll_offset.min(total.saturating_sub(visible));
            let rows: Vec<Line> = layout
                .rows
                .into_iter()
                .skip(start as usize)
                .take(visible as usize)
                .collect();
            Paragraph::new(rows).block(block).render(box_area, buf);
            render_scrollbar(box_area, total, visible, start, buf);
        }
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

/// Rows the input box shows for `value`, with the cursor cell parked at the end.
fn content_lines(props: &TextInputProps, value: &str, width: u16) -> u16 {
    let (shown, _) = shown_value(value, props, None);
    let layout = layout_rows(&shown, Some(shown.len()), inner_width(width), Style::default());
    visible_lines(props, layout.rows.len() as u16)
}

fn visible_lines(props: &TextInputProps, total: u16) -> u16 {
    if props.multiline {
        total.clamp(TEXTAREA_MIN_LINES, TEXTAREA_MAX_LINES)
    } else {
        total.min(SINGLE_LINE_MAX_LINES)
    }
}

/// Value as drawn (masked for secure inputs) plus the cursor mapped into it.
fn shown_value(value: &str, props: &TextInputProps, cursor: Option<usize>) -> (String, Option<usize>) {
    if !props.secure {
        return (value.to_string(), cursor);
    }
    let masked: String = value.chars().map(|_| MASK_CHAR).collect();
    let cursor = cursor.map(|pos| {
        let pos = clamp_to_boundary(value, pos);
        value[..pos].chars().count() * MASK_CHAR.len_utf8()
    });
    (masked, cursor)
}

struct RowLayout {
    rows: Vec<Line<'static>>,
    cursor_row: Option<u16>,
}

/// Break `text` into rows at most `width` columns wide, drawing the cursor
/// as a reversed cell.
fn layout_rows(text: &str, cursor: Option<usize>, width: u16, base: Style) -> RowLayout {
    let cursor = cursor.map(|pos| clamp_to_boundary(text, pos));
    let cursor_style = base.add_modifier(Modifier::REVERSED);
    let mut rows = RowBuilder::new(width);
    let mut cursor_row = None;

    for (i, c) in text.char_indices() {
        let at_cursor = cursor == Some(i);
        if c == '\n' {
            if at_cursor {
                cursor_row = Some(rows.push(" ", cursor_style));
            }
            rows.break_row();
            continue;
        }
        let style = if at_cursor { cursor_style } else { base };
        let row = rows.push(c.encode_utf8(&mut [0; 4]), style);
        if at_cursor {
            cursor_row = Some(row);
        }
    }
    if cursor == Some(text.len()) {
        cursor_row = Some(rows.push(" ", cursor_style));
    }

    RowLayout {
        rows: rows.finish(),
        cursor_row,
    }
}

struct RowBuilder {
    width: usize,
    rows: Vec<Vec<Span<'static>>>,
    used: usize,
}

impl RowBuilder {
    fn new(width: u16) -> Self {
        Self {
            width: width.max(1) as usize,
            rows: vec![Vec::new()],
            used: 0,
        }
    }

    /// Append a cell, wrapping first if it would overflow. Returns its row.
    fn push(&mut self, cell: &str, style: Style) -> u16 {
        let width = cell.width();
        if self.used > 0 && self.used + width > self.width {
            self.break_row();
        }
        self.used += width;
        if let Some(row) = self.rows.last_mut() {
            match row.last_mut() {
                Some(span) if span.style == style => span.content.to_mut().push_str(cell),
                _ => row.push(Span::styled(cell.to_string(), style)),
            }
        }
        (self.rows.len() - 1) as u16
    }

    fn break_row(&mut self) {
        self.rows.push(Vec::new());
        self.used = 0;
    }

    fn finish(self) -> Vec<Line<'static>> {
        self.rows.into_iter().map(Line::from).collect()
    }
}

/// Scrollbar on the right border when the rows outgrow the box.
fn render_scrollbar(area: Rect, total: u16, visible: u16, position: u16, buf: &mut Buffer) {
    if total <= visible {
        return;
    }

    // ScrollbarState content_length is max scrollable position, not total items
    let mut state = ScrollbarState::default()
        .content_length(total.saturating_sub(visible) as usize)
        .position(position as usize);
    let track = Rect {
        x: area.x + area.width.saturating_sub(1),
        y: area.y + 1,
        width: 1,
        height: area.height.saturating_sub(2),
    };
    StatefulWidget::render(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        track,
        buf,
        &mut state,
    );
}
