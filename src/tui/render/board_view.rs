use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Task, TaskStatus};
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::helpers::{fill_line, scroll_offset, selected_style};

/// Render the three status columns for the open project
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let Some(board) = &app.board else {
        return;
    };

    let mut summary: Vec<String> = Vec::new();
    if let Some(desc) = &board.project.description {
        summary.push(desc.clone());
    }
    if let Some(range) = board.project.date_range() {
        summary.push(range);
    }
    let summary_h = u16::from(!summary.is_empty());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_h), Constraint::Min(1)])
        .split(area);

    if !summary.is_empty() {
        let text = truncate_to_width(&format!(" {}", summary.join("  \u{00B7}  ")), area.width as usize);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(app.theme.dim).bg(bg)),
            rows[0],
        );
    }

    if board.tasks.is_empty() && !board.tasks.loaded {
        let msg = if board.tasks.loading {
            " Loading tasks\u{2026}"
        } else {
            " Could not load tasks (r to retry)"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg)),
            rows[1],
        );
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);

    let columns = board.columns();
    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let focused = i == app.board_column;
        render_column(
            frame,
            app,
            cols[i],
            *status,
            &columns[i],
            focused.then_some(app.board_cursors[i]),
        );
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    status: TaskStatus,
    tasks: &[&Task],
    cursor: Option<usize>,
) {
    let bg = app.theme.background;
    let border = if cursor.is_some() {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", status),
            Style::default()
                .fg(app.theme.status_color(status))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({}) ", tasks.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if tasks.is_empty() {
        frame.render_widget(
            Paragraph::new(" (empty)").style(Style::default().fg(app.theme.dim).bg(bg)),
            inner,
        );
        return;
    }

    let offset = cursor.map_or(0, |c| scroll_offset(c, height));
    let mut lines: Vec<Line> = Vec::new();
    for (i, task) in tasks.iter().enumerate().skip(offset).take(height) {
        let selected = cursor == Some(i);
        let style = selected_style(&app.theme, selected);
        let due = task.due_date.map(|d| format!(" {}", d.format("%m-%d")));
        let due_w = due.as_deref().map_or(0, display_width);
        let name_w = width.saturating_sub(1 + due_w);

        let mut spans = vec![
            Span::styled(" ", style),
            Span::styled(truncate_to_width(&task.name, name_w), style),
        ];
        if let Some(due) = due {
            let used = 1 + display_width(&truncate_to_width(&task.name, name_w));
            spans.push(Span::styled(" ".repeat(width.saturating_sub(used + due_w)), style));
            spans.push(Span::styled(due, style.fg(app.theme.dim)));
        }
        lines.push(fill_line(spans, width, style));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
