pub mod board_view;
pub mod confirm_overlay;
pub mod detail_view;
pub mod dialog_overlay;
pub mod header;
pub mod help_overlay;
pub mod login_view;
pub mod projects_view;
pub mod status_row;

mod helpers;
#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode, View};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // breadcrumb + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match app.view {
        View::Login => login_view::render_login_view(frame, app, chunks[1]),
        View::Projects => projects_view::render_projects_view(frame, app, chunks[1]),
        View::Board => board_view::render_board_view(frame, app, chunks[1]),
        View::Detail => detail_view::render_detail_view(frame, app, chunks[1]),
    }

    // Overlays (rendered on top of the content)
    match app.mode {
        Mode::Dialog => {
            if let Some(dialog) = &app.dialog {
                dialog_overlay::render_dialog_overlay(frame, app, dialog, chunks[1]);
            }
        }
        Mode::Confirm => confirm_overlay::render_confirm_overlay(frame, app, chunks[1]),
        Mode::Navigate | Mode::Comment => {}
    }

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
