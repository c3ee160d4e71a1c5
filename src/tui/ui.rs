use crate::core::state::Dialog;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FormView, SelectorScreen, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_ui(frame: &mut Frame, dialog: &Dialog, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let error_height = dialog
        .error
        .as_deref()
        .map(|e| error_height(e, frame.area().width))
        .unwrap_or(0);
    let layout = Layout::vertical([Length(1), Min(0), Length(error_height), Length(1)]);
    let [title_area, form_area, error_area, help_area] = layout.areas(frame.area());

    TitleBar::new(
        dialog.title().to_string(),
        dialog.status_message.clone(),
        dialog.form.submitting,
    )
    .render(frame, title_area);

    FormView::new(&mut tui.form, dialog, &mut tui.editor).render(frame, form_area);

    if let Some(error_msg) = &dialog.error {
        draw_error_view(frame, error_area, error_msg);
    }

    frame.render_widget(help_line(dialog, tui), help_area);

    // Overlay last so it sits on top of the form
    if let Some(selector) = tui.selector_screen.as_mut() {
        SelectorScreen::new(selector).render(frame, frame.area());
    }
}

fn error_height(error_msg: &str, width: u16) -> u16 {
    let inner = width.saturating_sub(2).max(1) as usize;
    let lines = textwrap::wrap(error_msg, inner).len().clamp(1, 4) as u16;
    lines + 2
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

fn help_line(dialog: &Dialog, tui: &TuiState) -> Line<'static> {
    let key = Style::default().fg(Color::Cyan);
    let text = Style::default().fg(Color::DarkGray);

    let pairs: Vec<(&str, String)> = if dialog.closed {
        vec![("Ctrl+C", "Quit".to_string())]
    } else if tui.selector_screen.is_some() {
        vec![
            ("Enter", "Select".to_string()),
            ("Esc", "Back".to_string()),
        ]
    } else if dialog.form.submitting {
        vec![("Ctrl+C", "Quit".to_string())]
    } else {
        vec![
            ("Tab", "Next".to_string()),
            ("Shift+Tab", "Prev".to_string()),
            ("Ctrl+S", dialog.definition.submit_label().to_string()),
            ("Esc", "Cancel".to_string()),
        ]
    };

    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (k, label) in pairs {
        spans.push(Span::styled(format!(" {k} "), key));
        spans.push(Span::styled(format!("{label} "), text));
    }
    Line::from(spans)
}
