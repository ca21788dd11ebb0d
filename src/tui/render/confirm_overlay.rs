use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};
use crate::util::unicode::truncate_to_width;

use super::helpers::centered_fixed;

/// What the open confirmation would delete, with its warning line
fn pending(app: &App) -> Option<(&'static str, String, &'static str, bool)> {
    match app.view {
        View::Projects => app.projects.pending_delete.as_ref().map(|p| {
            (
                "Delete project?",
                p.name.clone(),
                "Its tasks and comments are deleted too.",
                app.projects.deleting,
            )
        }),
        View::Detail => app
            .detail
            .as_ref()
            .filter(|d| d.confirm_delete)
            .map(|d| {
                (
                    "Delete task?",
                    d.task.name.clone(),
                    "Its comments are deleted too.",
                    d.deleting,
                )
            }),
        View::Login | View::Board => None,
    }
}

/// Render the delete confirmation popup
pub fn render_confirm_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some((title, name, warning, busy)) = pending(app) else {
        return;
    };
    let bg = app.theme.background;
    let popup_w: u16 = 50.min(area.width.saturating_sub(2));
    let popup = centered_fixed(popup_w, 8, area);
    frame.render_widget(Clear, popup);

    let header_style = Style::default()
        .fg(app.theme.red)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let inner_w = popup_w.saturating_sub(4) as usize;
    let lines = vec![
        Line::from(Span::styled(format!(" {}", title), header_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", truncate_to_width(&name, inner_w)),
            bright_style,
        )),
        Line::from(Span::styled(format!("  {}", warning), text_style)),
        Line::from(""),
        if busy {
            Line::from(Span::styled(" Deleting\u{2026}", dim_style))
        } else {
            Line::from(vec![
                Span::styled(" y", Style::default().fg(app.theme.red).bg(bg)),
                Span::styled(" delete  ", text_style),
                Span::styled("n", Style::default().fg(app.theme.highlight).bg(bg)),
                Span::styled(" keep", text_style),
            ])
        },
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
