mod common;
mod confirm;
mod form;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode, View};

use common::normalize_key;
use confirm::handle_confirm;
use form::{handle_comment, handle_dialog, handle_login};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);

    if app.view == View::Login {
        handle_login(app, key);
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Dialog => handle_dialog(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::Comment => handle_comment(app, key),
    }
}
