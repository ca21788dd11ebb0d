use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::Dialog;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::helpers::{centered_fixed, field_line};

/// Render the open create/edit/extend dialog on top of the current view
pub fn render_dialog_overlay(frame: &mut Frame, app: &App, dialog: &Dialog, area: Rect) {
    let bg = app.theme.background;
    let popup_w: u16 = 60.min(area.width.saturating_sub(2));
    // title, blank, fields, blank, error, buttons, borders
    let popup_h = dialog.fields.len() as u16 + 7;
    let popup = centered_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let inner_w = popup_w.saturating_sub(2) as usize;
    let label_w = dialog
        .fields
        .iter()
        .map(|f| display_width(f.label) + usize::from(f.required))
        .max()
        .unwrap_or(0);

    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(format!(" {}", dialog.title()), header_style)),
        Line::from(""),
    ];
    for (i, field) in dialog.fields.iter().enumerate() {
        lines.push(field_line(field, i == dialog.focus, label_w, &app.theme));
    }
    lines.push(Line::from(""));

    match &dialog.error {
        Some(err) => lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(err, inner_w.saturating_sub(1))),
            Style::default().fg(app.theme.red).bg(bg),
        ))),
        None => lines.push(Line::from("")),
    }

    let action = if dialog.submitting {
        Span::styled(" Saving\u{2026}", dim_style)
    } else {
        Span::styled(
            format!(" Enter {}", dialog.submit_label()),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )
    };
    lines.push(Line::from(vec![
        action,
        Span::styled("  Tab next  Esc cancel", dim_style),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
