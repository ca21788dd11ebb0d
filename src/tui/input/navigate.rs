use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::TaskStatus;
use crate::ops::Dialog;
use crate::tui::app::{App, Mode, View};

use super::common::step;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything until dismissed
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            return;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    match app.view {
        View::Login => {}
        View::Projects => handle_projects(app, key),
        View::Board => handle_board(app, key),
        View::Detail => handle_detail(app, key),
    }
}

fn handle_projects(app: &mut App, key: KeyEvent) {
    let len = app.projects.projects.len();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.project_cursor = step(app.project_cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => app.project_cursor = step(app.project_cursor, len, false),
        KeyCode::Char('g') | KeyCode::Home => app.project_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.project_cursor = len.saturating_sub(1),
        KeyCode::Enter => {
            if let Some(project) = app.selected_project().cloned() {
                app.open_board(project);
            }
        }
        KeyCode::Char('n') => app.open_dialog(Dialog::create_project()),
        KeyCode::Char('e') => {
            if let Some(project) = app.selected_project() {
                let dialog = Dialog::edit_project(project);
                app.open_dialog(dialog);
            }
        }
        KeyCode::Char('x') => {
            if let Some(project) = app.selected_project() {
                let dialog = Dialog::extend_project(project);
                app.open_dialog(dialog);
            }
        }
        KeyCode::Char('d') => app.request_project_delete(),
        KeyCode::Char('r') => app.reload_projects(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn handle_board(app: &mut App, key: KeyEvent) {
    let col = app.board_column;
    let len = app
        .board
        .as_ref()
        .map_or(0, |b| b.column(TaskStatus::ALL[col]).len());
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.show_projects(),
        KeyCode::Char('h') | KeyCode::Left => app.board_column = col.saturating_sub(1),
        KeyCode::Char('l') | KeyCode::Right => app.board_column = (col + 1).min(2),
        KeyCode::Char('j') | KeyCode::Down => {
            app.board_cursors[col] = step(app.board_cursors[col], len, true)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.board_cursors[col] = step(app.board_cursors[col], len, false)
        }
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('n') => {
            if let Some(board) = &app.board {
                let dialog = Dialog::create_task(&board.project);
                app.open_dialog(dialog);
            }
        }
        KeyCode::Char('r') => app.reload_board(),
        _ => {}
    }
}

fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char('1') => app.change_status(TaskStatus::Todo),
        KeyCode::Char('2') => app.change_status(TaskStatus::InProgress),
        KeyCode::Char('3') => app.change_status(TaskStatus::Completed),
        KeyCode::Char('c') => app.cancel_task(),
        KeyCode::Char('m') => {
            if let Some(detail) = &app.detail {
                let dialog = Dialog::modify_task(&detail.task);
                app.open_dialog(dialog);
            }
        }
        KeyCode::Char('x') => {
            if let Some(detail) = &app.detail {
                let dialog = Dialog::extend_task(&detail.task);
                app.open_dialog(dialog);
            }
        }
        KeyCode::Char('d') => app.request_task_delete(),
        KeyCode::Char('a') => app.mode = Mode::Comment,
        KeyCode::Char('r') => {
            app.reload_board();
            if let Some(detail) = &mut app.detail {
                detail.reload_comments(&app.client, &mut app.feedback);
            }
        }
        _ => {}
    }
}
