use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::{fill_line, scroll_offset, selected_style};

/// Render the project list
pub fn render_projects_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let listing = &app.projects.projects;

    if listing.is_empty() {
        let msg = if listing.loading {
            " Loading projects\u{2026}"
        } else if !listing.loaded {
            " Could not load projects (r to retry)"
        } else {
            " No projects yet. Press n to create one."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    let offset = scroll_offset(app.project_cursor, height);
    let pending = app.projects.pending_delete.as_ref().map(|p| &p.id);

    let mut lines: Vec<Line> = Vec::new();
    for (i, project) in listing.items.iter().enumerate().skip(offset).take(height) {
        let selected = i == app.project_cursor;
        let style = selected_style(&app.theme, selected);
        let dim = if selected {
            style.fg(app.theme.dim)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };

        let marker = if selected { "\u{25B8} " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, style.fg(app.theme.highlight)),
            Span::styled(format!("{}  ", project.id), dim),
        ];
        let name_style = if pending == Some(&project.id) {
            style.fg(app.theme.red)
        } else {
            style
        };
        let budget = width.saturating_sub(12);
        spans.push(Span::styled(truncate_to_width(&project.name, budget), name_style));
        if let Some(range) = project.date_range() {
            spans.push(Span::styled(format!("  {}", range), dim));
        }

        lines.push(fill_line(spans, width, style));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
