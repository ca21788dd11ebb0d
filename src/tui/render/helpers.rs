use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::TaskStatus;
use crate::ops::{Field, FieldKind};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Status symbols, markdown checkbox style
pub(super) fn status_symbol(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "[ ]",
        TaskStatus::InProgress => "[>]",
        TaskStatus::Completed => "[x]",
    }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad a line of spans out to `width`
pub(super) fn fill_line<'a>(mut spans: Vec<Span<'a>>, width: usize, pad: Style) -> Line<'a> {
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), pad));
    }
    Line::from(spans)
}

/// Row style for the cursor line
pub(super) fn selected_style(theme: &Theme, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(theme.background)
    }
}

/// A fixed-size rectangle centered in `area`, clamped to fit
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// One form input: `Label*  value` with a bar cursor when focused.
/// Status fields render as a `< value >` selector.
pub(super) fn field_line<'a>(field: &'a Field, focused: bool, label_w: usize, theme: &Theme) -> Line<'a> {
    let bg = theme.background;
    let label_style = if focused {
        Style::default()
            .fg(theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(bg)
    };
    let value_style = Style::default().fg(theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(theme.highlight).bg(bg);

    let label = if field.required {
        format!("{}*", field.label)
    } else {
        field.label.to_string()
    };
    let mut spans = vec![
        Span::styled("  ", Style::default().bg(bg)),
        Span::styled(unicode::pad_to_width(&label, label_w), label_style),
        Span::styled("  ", Style::default().bg(bg)),
    ];

    match field.kind {
        FieldKind::Status => {
            let arrows = if focused { cursor_style } else { label_style };
            spans.push(Span::styled("< ", arrows));
            spans.push(Span::styled(field.value.as_str(), value_style));
            spans.push(Span::styled(" >", arrows));
        }
        FieldKind::Text | FieldKind::Date => {
            if focused {
                let at = field.cursor.min(field.value.len());
                spans.push(Span::styled(&field.value[..at], value_style));
                spans.push(Span::styled("\u{258C}", cursor_style));
                spans.push(Span::styled(&field.value[at..], value_style));
            } else if field.value.is_empty() && field.kind == FieldKind::Date {
                spans.push(Span::styled("YYYY-MM-DD", Style::default().fg(theme.dim).bg(bg)));
            } else {
                spans.push(Span::styled(field.value.as_str(), value_style));
            }
        }
    }
    Line::from(spans)
}

/// Keep `cursor` visible inside a window of `height` rows
pub(super) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        0
    } else {
        cursor.saturating_sub(height - 1)
    }
}
