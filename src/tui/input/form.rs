use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::{Field, FieldKind};
use crate::tui::app::{App, Mode};
use crate::util::unicode::prev_grapheme_boundary;

/// Cursor movement and editing shared by every single-line field
fn edit_field(field: &mut Field, key: KeyEvent) {
    match key.code {
        KeyCode::Left if field.kind == FieldKind::Status => field.cycle(false),
        KeyCode::Right if field.kind == FieldKind::Status => field.cycle(true),
        KeyCode::Char(' ') if field.kind == FieldKind::Status => field.cycle(true),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => field.home(),
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => field.end(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.set(""),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            field.insert_char(c)
        }
        _ => {}
    }
}

pub(super) fn handle_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.focus = (app.login.focus + 1) % app.login.fields.len();
        }
        _ => edit_field(app.login.focused_mut(), key),
    }
}

pub(super) fn handle_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_dialog(),
        _ => {
            let Some(dialog) = &mut app.dialog else {
                app.mode = Mode::Navigate;
                return;
            };
            if dialog.submitting {
                return;
            }
            match key.code {
                KeyCode::Tab | KeyCode::Down => dialog.focus_next(),
                KeyCode::BackTab | KeyCode::Up => dialog.focus_prev(),
                _ => edit_field(dialog.focused_mut(), key),
            }
        }
    }
}

pub(super) fn handle_comment(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Enter => app.submit_comment(),
        _ => {
            let Some(detail) = &mut app.detail else {
                app.mode = Mode::Navigate;
                return;
            };
            if detail.posting {
                return;
            }
            let input = &mut detail.comment_input;
            match key.code {
                KeyCode::Backspace => {
                    if let Some(at) = prev_grapheme_boundary(input, input.len()) {
                        input.truncate(at);
                    }
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.clear()
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.push(c)
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Dialog;
    use crate::ops::dialog::labels;
    use crate::ops::test_support::Harness;
    use crate::tui::app::tests::signed_in_app;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn status_field_cycles_with_arrows() {
        let h = Harness::new();
        let web = h.project("Web");
        let (mut app, _tmp) = signed_in_app(h);
        app.open_dialog(Dialog::create_task(&web));
        handle_dialog(&mut app, key(KeyCode::BackTab));
        let dialog = app.dialog.as_ref().unwrap();
        assert_eq!(dialog.fields[dialog.focus].label, labels::STATUS);
        handle_dialog(&mut app, key(KeyCode::Right));
        assert_eq!(app.dialog.as_ref().unwrap().value(labels::STATUS), "In Progress");
        handle_dialog(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.dialog.as_ref().unwrap().value(labels::STATUS), "In Progress");
        handle_dialog(&mut app, key(KeyCode::Left));
        assert_eq!(app.dialog.as_ref().unwrap().value(labels::STATUS), "To-Do");
    }

    #[test]
    fn text_field_edits_at_cursor() {
        let (mut app, _tmp) = signed_in_app(Harness::new());
        app.open_dialog(Dialog::create_project());
        for c in "Wb".chars() {
            handle_dialog(&mut app, key(KeyCode::Char(c)));
        }
        handle_dialog(&mut app, key(KeyCode::Left));
        handle_dialog(&mut app, key(KeyCode::Char('e')));
        assert_eq!(app.dialog.as_ref().unwrap().value(labels::NAME), "Web");
        handle_dialog(&mut app, key(KeyCode::End));
        handle_dialog(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.dialog.as_ref().unwrap().value(labels::NAME), "We");
    }

    #[test]
    fn comment_backspace_removes_whole_grapheme() {
        let h = Harness::new();
        let web = h.project("Web");
        h.task(&web, "a", crate::model::TaskStatus::Todo);
        let (mut app, _tmp) = signed_in_app(h);
        app.open_board(web);
        app.open_detail();
        app.mode = Mode::Comment;

        for c in "ok e\u{301}".chars() {
            handle_comment(&mut app, key(KeyCode::Char(c)));
        }
        handle_comment(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.detail.as_ref().unwrap().comment_input, "ok ");
        handle_comment(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
    }
}
