use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let text_color = app.theme.text;
    let bright = app.theme.text_bright;
    let highlight = app.theme.highlight;
    let dim = app.theme.dim;

    let key_style = Style::default()
        .fg(highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(text_color).bg(bg);
    let header_style = Style::default()
        .fg(bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    match app.view {
        View::Login => {}
        View::Projects => {
            lines.push(Line::from(Span::styled(" Projects", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " g/G", "Jump to top/bottom", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Open board", key_style, desc_style);
            add_binding(&mut lines, " n", "New project", key_style, desc_style);
            add_binding(&mut lines, " e", "Edit project", key_style, desc_style);
            add_binding(&mut lines, " x", "Extend project dates", key_style, desc_style);
            add_binding(&mut lines, " d", "Delete project", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload", key_style, desc_style);
            add_binding(&mut lines, " L", "Log out", key_style, desc_style);
            lines.push(Line::from(""));
        }
        View::Board => {
            lines.push(Line::from(Span::styled(" Board", header_style)));
            add_binding(&mut lines, " \u{2190}\u{2192}/hl", "Switch column", key_style, desc_style);
            add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Open task", key_style, desc_style);
            add_binding(&mut lines, " n", "New task", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Back to projects", key_style, desc_style);
            lines.push(Line::from(""));
        }
        View::Detail => {
            lines.push(Line::from(Span::styled(" Task", header_style)));
            add_binding(&mut lines, " 1/2/3", "Set To-Do / In Progress / Completed", key_style, desc_style);
            add_binding(&mut lines, " c", "Cancel (back to To-Do)", key_style, desc_style);
            add_binding(&mut lines, " m", "Modify name/description", key_style, desc_style);
            add_binding(&mut lines, " x", "Extend due date", key_style, desc_style);
            add_binding(&mut lines, " a", "Add comment", key_style, desc_style);
            add_binding(&mut lines, " d", "Delete task", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Back to board", key_style, desc_style);
            lines.push(Line::from(""));
        }
    }

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit / back", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+C", "Quit (immediate)", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
