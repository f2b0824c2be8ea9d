//! Key tokens and modifier handling.
//!
//! Raw terminal events arrive as crossterm `KeyEvent`s. The rest of the crate
//! works with a `(key, Modifiers)` pair where `key` is either a single
//! character (`"j"`, `"G"`, `" "`) or a named key (`"Enter"`, `"Escape"`,
//! `"Tab"`, `"Up"`, ...).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const ENTER: &str = "Enter";
pub const ESCAPE: &str = "Escape";
pub const TAB: &str = "Tab";
pub const BACKSPACE: &str = "Backspace";
pub const DELETE: &str = "Delete";
pub const UP: &str = "Up";
pub const DOWN: &str = "Down";
pub const LEFT: &str = "Left";
pub const RIGHT: &str = "Right";
pub const HOME: &str = "Home";
pub const END: &str = "End";
pub const PAGE_UP: &str = "PageUp";
pub const PAGE_DOWN: &str = "PageDown";
pub const SPACE: &str = " ";

/// Modifier flags accompanying a key press.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Return true if no modifier is held.
    ///
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(modifiers: KeyModifiers) -> Self {
        Modifiers {
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            alt: modifiers.contains(KeyModifiers::ALT),
            shift: modifiers.contains(KeyModifiers::SHIFT),
            meta: modifiers.contains(KeyModifiers::META) || modifiers.contains(KeyModifiers::SUPER),
        }
    }
}

/// Convert a crossterm key event into a `(key, Modifiers)` pair. Returns None
/// for keys the browser never consumes (function keys, media keys, ...).
///
pub fn from_key_event(event: &KeyEvent) -> Option<(String, Modifiers)> {
    let mut modifiers = Modifiers::from(event.modifiers);
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => ENTER.to_string(),
        KeyCode::Esc => ESCAPE.to_string(),
        KeyCode::Tab => TAB.to_string(),
        KeyCode::BackTab => {
            modifiers.shift = true;
            TAB.to_string()
        }
        KeyCode::Backspace => BACKSPACE.to_string(),
        KeyCode::Delete => DELETE.to_string(),
        KeyCode::Up => UP.to_string(),
        KeyCode::Down => DOWN.to_string(),
        KeyCode::Left => LEFT.to_string(),
        KeyCode::Right => RIGHT.to_string(),
        KeyCode::Home => HOME.to_string(),
        KeyCode::End => END.to_string(),
        KeyCode::PageUp => PAGE_UP.to_string(),
        KeyCode::PageDown => PAGE_DOWN.to_string(),
        _ => return None,
    };
    Some((key, modifiers))
}

/// Normalize a key into the token stored in the command buffer.
///
/// Ctrl chords become `ctrl+<lowercase key>`, shifted single characters are
/// upper-cased and everything else passes through unchanged.
///
pub fn normalize(key: &str, modifiers: Modifiers) -> String {
    if modifiers.ctrl {
        return format!("ctrl+{}", key.to_lowercase());
    }
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if modifiers.shift {
            return c.to_uppercase().collect();
        }
    }
    key.to_string()
}

/// Return true if the key is a single printable character.
///
pub fn printable_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Format a single key token for display in help listings.
///
pub fn format_token(token: &str) -> String {
    if let Some(rest) = token.strip_prefix("ctrl+") {
        return format!("Ctrl+{}", format_token(rest));
    }
    match token {
        SPACE => "Space".to_string(),
        ESCAPE => "Esc".to_string(),
        _ => token.to_string(),
    }
}

/// Format a key sequence for display. Single-character sequences are joined
/// directly (`gg`), anything containing a named key is space separated.
///
pub fn format_keys(keys: &[&str]) -> String {
    if keys.iter().all(|k| printable_char(k).is_some() && *k != SPACE) {
        keys.concat()
    } else {
        keys.iter()
            .map(|k| format_token(k))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_normalize_ctrl_lowercases() {
        assert_eq!(normalize("D", Modifiers::CTRL), "ctrl+d");
        assert_eq!(normalize("Enter", Modifiers::CTRL), "ctrl+enter");
    }

    #[test]
    fn test_normalize_shift_uppercases_single_chars() {
        assert_eq!(normalize("g", Modifiers::SHIFT), "G");
        assert_eq!(normalize("Tab", Modifiers::SHIFT), "Tab");
    }

    #[test]
    fn test_normalize_passes_other_keys() {
        assert_eq!(normalize("j", Modifiers::NONE), "j");
        assert_eq!(normalize("Escape", Modifiers::NONE), "Escape");
    }

    #[test]
    fn test_from_key_event() {
        let (key, modifiers) =
            from_key_event(&event(KeyCode::Char('d'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(key, "d");
        assert!(modifiers.ctrl);

        let (key, modifiers) = from_key_event(&event(KeyCode::BackTab, KeyModifiers::SHIFT)).unwrap();
        assert_eq!(key, TAB);
        assert!(modifiers.shift);

        assert!(from_key_event(&event(KeyCode::F(5), KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn test_format_keys() {
        assert_eq!(format_keys(&["g", "g"]), "gg");
        assert_eq!(format_keys(&["ctrl+d"]), "Ctrl+d");
        assert_eq!(format_keys(&[" "]), "Space");
        assert_eq!(format_keys(&["Escape"]), "Esc");
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(printable_char("a"), Some('a'));
        assert_eq!(printable_char("Enter"), None);
        assert_eq!(printable_char(""), None);
    }
}
