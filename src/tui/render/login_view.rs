use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::display_width;

use super::helpers::{centered_fixed, field_line};

/// Render the sign-in form shown when no session exists
pub fn render_login_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let popup = centered_fixed(50, 9, area);

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label_w = app
        .login
        .fields
        .iter()
        .map(|f| display_width(f.label) + usize::from(f.required))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(" Sign in to TaskFlow", header_style)),
        Line::from(""),
    ];
    for (i, field) in app.login.fields.iter().enumerate() {
        lines.push(field_line(field, i == app.login.focus, label_w, &app.theme));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab next field  Enter sign in  Esc quit",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
