use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::{display_width, truncate_to_width};

use super::helpers::{fill_line, spans_width};

/// Render the header: breadcrumb on the left, signed-in user on the right,
/// with a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // breadcrumb
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_breadcrumb(frame, app, chunks[0]);

    let sep = Paragraph::new("\u{2500}".repeat(area.width as usize))
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep, chunks[1]);
}

fn render_breadcrumb(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let crumb = Style::default().fg(app.theme.text).bg(bg);
    let current = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let sep = Span::styled(" \u{203A} ", Style::default().fg(app.theme.dim).bg(bg));

    let mut parts: Vec<String> = vec!["TaskFlow".to_string()];
    match app.view {
        View::Login => parts.push("Sign in".to_string()),
        View::Projects => parts.push("Projects".to_string()),
        View::Board | View::Detail => {
            parts.push("Projects".to_string());
            if let Some(board) = &app.board {
                parts.push(board.project.name.clone());
            }
            if app.view == View::Detail
                && let Some(detail) = &app.detail
            {
                parts.push(detail.task.id.to_string());
            }
        }
    }

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
    ];
    let last = parts.len() - 1;
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            spans.push(sep.clone());
        }
        let style = if i == last { current } else { crumb };
        spans.push(Span::styled(part, style));
    }

    if let Some(user) = app.gate.user() {
        let used = spans_width(&spans);
        let room = width.saturating_sub(used + 2);
        if room > 4 {
            let name = truncate_to_width(&user.name, room - 1);
            let pad = width.saturating_sub(used + display_width(&name) + 1);
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
            spans.push(Span::styled(
                name,
                Style::default().fg(app.theme.cyan).bg(bg),
            ));
        }
    }

    let line = fill_line(spans, width, Style::default().bg(bg));
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
