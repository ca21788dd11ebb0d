use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::TaskStatus;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width, wrap};

use super::helpers::status_symbol;

/// Render the detail view for the open task: fields, description, comments,
/// and the comment input at the bottom
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let task = &detail.task;
    let bg = app.theme.background;
    let width = area.width as usize;

    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);
    let key_style = Style::default().fg(app.theme.highlight).bg(bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let mut lines: Vec<Line> = vec![Line::from("")];

    // Title
    let status_style = Style::default()
        .fg(app.theme.status_color(task.status))
        .bg(bg);
    lines.push(Line::from(vec![
        Span::styled(" ", text_style),
        Span::styled(status_symbol(task.status), status_style),
        Span::styled(format!(" {} ", task.id), dim_style),
        Span::styled(task.name.as_str(), bright_style),
    ]));
    lines.push(Line::from(""));

    // Fields
    let project_name = app
        .board
        .as_ref()
        .map_or(String::new(), |b| b.project.name.clone());
    let due = task
        .due_date
        .map_or("none".to_string(), |d| d.to_string());
    let mut status_value = vec![Span::styled(task.status.to_string(), status_style)];
    if detail.updating {
        status_value.push(Span::styled("  updating\u{2026}", dim_style));
    }
    let rows: [(&str, Vec<Span>); 3] = [
        ("Project", vec![Span::styled(project_name, text_style)]),
        ("Status", status_value),
        ("Due", vec![Span::styled(due, text_style)]),
    ];
    for (key, value) in rows {
        let mut spans = vec![Span::styled(format!("   {:<9}", key), dim_style)];
        spans.extend(value);
        lines.push(Line::from(spans));
    }

    // Status shortcuts
    let mut shortcuts = vec![Span::styled("   ", text_style)];
    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let style = if *status == task.status {
            Style::default()
                .fg(app.theme.status_color(*status))
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            text_style
        };
        shortcuts.push(Span::styled(format!("{}", i + 1), key_style));
        shortcuts.push(Span::styled(format!(" {} ", status), style));
        shortcuts.push(Span::styled("  ", text_style));
    }
    shortcuts.push(Span::styled("c", key_style));
    shortcuts.push(Span::styled(" cancel", text_style));
    lines.push(Line::from(shortcuts));
    lines.push(Line::from(""));

    // Description
    match &task.description {
        Some(desc) if !desc.trim().is_empty() => {
            for para in desc.lines() {
                for row in wrap(para, width.saturating_sub(4)) {
                    lines.push(Line::from(Span::styled(format!("   {}", row), text_style)));
                }
            }
        }
        _ => lines.push(Line::from(Span::styled("   No description", dim_style))),
    }
    lines.push(Line::from(""));

    // Comments
    lines.push(Line::from(Span::styled(
        format!(" Comments ({})", detail.comments.len()),
        bright_style,
    )));
    if detail.comments.is_empty() {
        let msg = if detail.comments.loading {
            "   Loading comments\u{2026}"
        } else if !detail.comments.loaded {
            "   Could not load comments"
        } else {
            "   No comments yet"
        };
        lines.push(Line::from(Span::styled(msg, dim_style)));
    }
    for comment in &detail.comments.items {
        let stamp = comment
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let indent = 3 + display_width(&stamp) + 2;
        let body = wrap(&comment.text, width.saturating_sub(indent + 1));
        for (i, row) in body.into_iter().enumerate() {
            let lead = if i == 0 {
                Span::styled(format!("   {}  ", stamp), dim_style)
            } else {
                Span::styled(" ".repeat(indent), text_style)
            };
            lines.push(Line::from(vec![lead, Span::styled(row, text_style)]));
        }
    }

    // Keep the tail visible when comments overflow
    let height = chunks[0].height as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .scroll((scroll, 0)),
        chunks[0],
    );

    render_comment_input(frame, app, chunks[1]);
}

fn render_comment_input(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let bg = app.theme.background;
    let width = area.width as usize;
    let active = app.mode == Mode::Comment;

    let sep = Line::from(Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    let prompt_style = if active {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let mut spans = vec![Span::styled(" > ", prompt_style)];
    if detail.posting {
        spans.push(Span::styled(
            "Posting\u{2026}",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else if active {
        let room = width.saturating_sub(5);
        let input = &detail.comment_input;
        // Show the end of long input so the cursor stays in view
        let shown = if display_width(input) > room {
            let skip = input
                .char_indices()
                .find(|(i, _)| display_width(&input[*i..]) <= room)
                .map_or(input.len(), |(i, _)| i);
            &input[skip..]
        } else {
            input.as_str()
        };
        spans.push(Span::styled(
            shown.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)));
    } else if detail.comment_input.is_empty() {
        spans.push(Span::styled(
            "a to add a comment",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            truncate_to_width(&detail.comment_input, width.saturating_sub(4)),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(vec![sep, Line::from(spans)]).style(Style::default().bg(bg)),
        area,
    );
}
