use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::feedback::ToastKind;
use crate::tui::app::{App, Mode, View};
use crate::util::unicode::{display_width, truncate_to_width};

/// Key hints for the current screen
fn hints(app: &App) -> &'static str {
    match (app.mode, app.view) {
        (Mode::Comment, _) => "Enter post  Esc cancel",
        (Mode::Dialog, _) => "Enter save  Esc cancel",
        (Mode::Confirm, _) => "y delete  n keep",
        (_, View::Login) => "Enter sign in  Esc quit",
        (_, View::Projects) => "Enter open  n new  e edit  x extend  d delete  ? help",
        (_, View::Board) => "Enter open  n new task  h/l column  Esc back  ? help",
        (_, View::Detail) => "1/2/3 status  c cancel  a comment  m modify  d delete  ? help",
    }
}

/// Render the status row (bottom of screen): the latest toast, otherwise
/// right-aligned key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    if let Some(toast) = app.feedback.latest() {
        let color = match toast.kind {
            ToastKind::Success => app.theme.green,
            ToastKind::Error => app.theme.red,
        };
        spans.push(Span::styled(
            format!(" {}", truncate_to_width(&toast.message, width.saturating_sub(1))),
            Style::default().fg(color).bg(bg),
        ));
    }

    if app.show_key_hints || app.mode != Mode::Navigate {
        let hint = hints(app);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
