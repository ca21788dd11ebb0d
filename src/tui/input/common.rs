use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Terminals disagree on whether Shift+letter arrives as an uppercase char,
/// a SHIFT modifier, or both. Fold all of them into an uppercase char.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

/// Move a cursor within `len` items (no wrap)
pub(super) fn step(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}
