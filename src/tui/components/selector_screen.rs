//! # Selector Screen Component
//!
//! Full-screen overlay that lists the candidates for one select field:
//! directory users, directory channels, or the field's static options.
//! Opened when the core asks for `SELECTOR_SCREEN`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SelectorScreenState` lives in `TuiState` while the overlay is open
//! - `SelectorScreen` is created each frame with borrowed state
//!
//! Typing filters the list; Up/Down move the highlight; Enter answers with
//! the highlighted record and Esc answers with nothing.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::directory::Directory;
use crate::core::selection::{NameFormatter, SelectionRecord, TeammateNameDisplay};
use crate::core::selector::{ScreenRequest, SelectorRegistration};
use crate::tui::component::EventHandler;
use crate::tui::components::{centered_rect, pad_to_width, truncate_str};
use crate::tui::event::TuiEvent;

/// Persistent state for the selector overlay.
pub struct SelectorScreenState {
    /// Who asked, and with which token
    pub registration: SelectorRegistration,
    pub title: String,
    entries: Vec<SelectionRecord>,
    pub query: String,
    /// Index into `visible()`
    pub selected: usize,
    pub list_state: ListState,
    name_display: TeammateNameDisplay,
    formatter: NameFormatter,
}

impl SelectorScreenState {
    pub fn open(
        request: ScreenRequest,
        directory: &Directory,
        name_display: TeammateNameDisplay,
        formatter: NameFormatter,
    ) -> Self {
        let entries = directory.entries(
            request.registration.data_source,
            &request.registration.options,
        );
        let mut state = Self {
            registration: request.registration,
            title: request.title,
            entries,
            query: String::new(),
            selected: 0,
            list_state: ListState::default(),
            name_display,
            formatter,
        };
        state.reset_selection();
        state
    }

    /// Entries matching the current query, in directory order.
    pub fn visible(&self) -> Vec<&SelectionRecord> {
        self.entries
            .iter()
            .filter(|e| e.matches(&self.query, self.name_display, self.formatter))
            .collect()
    }

    pub fn label(&self, record: &SelectionRecord) -> String {
        record.label(self.name_display, self.formatter)
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        let any = !self.visible().is_empty();
        self.list_state.select(any.then_some(0));
    }
}

/// Events emitted by the selector overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEvent {
    Select(SelectionRecord),
    Dismiss,
}

impl EventHandler for SelectorScreenState {
    type Event = SelectorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(SelectorEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::PrevField => {
                self.selected = self.selected.saturating_sub(1);
                if !self.visible().is_empty() {
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown | TuiEvent::NextField => {
                let count = self.visible().len();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Enter => self
                .visible()
                .get(self.selected)
                .map(|record| SelectorEvent::Select((*record).clone())),
            TuiEvent::InputChar(c) => {
                self.query.push(*c);
                self.reset_selection();
                None
            }
            TuiEvent::Paste(text) => {
                self.query
                    .extend(text.chars().filter(|c| !c.is_control()));
                self.reset_selection();
                None
            }
            TuiEvent::Backspace => {
                if self.query.pop().is_some() {
                    self.reset_selection();
                }
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the selector overlay.
pub struct SelectorScreen<'a> {
    state: &'a mut SelectorScreenState,
}

impl<'a> SelectorScreen<'a> {
    pub fn new(state: &'a mut SelectorScreenState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let help_text = " Type to filter  Enter Select  Esc Back ";
        let title = if self.state.query.is_empty() {
            format!(" {} ", self.state.title)
        } else {
            format!(" {} / {} ", self.state.title, self.state.query)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let visible = self.state.visible();
        if visible.is_empty() {
            let message = if self.state.query.is_empty() {
                "Nothing to choose from."
            } else {
                "No matches."
            };
            let empty = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let label = self.state.label(record);
                let detail = match record {
                    SelectionRecord::User(user) if label != user.username => {
                        format!("  @{}", user.username)
                    }
                    SelectionRecord::Channel(channel) => format!("  ~{}", channel.name),
                    _ => String::new(),
                };
                let label_width = inner_width.saturating_sub(detail.width());
                let padded = pad_to_width(&truncate_str(&label, label_width), label_width);

                let is_selected = i == self.state.selected;
                let style = if is_selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let detail_style = if is_selected {
                    style
                } else {
                    Style::default().fg(Color::DarkGray)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(padded, style),
                    Span::styled(detail, detail_style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);

        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}
