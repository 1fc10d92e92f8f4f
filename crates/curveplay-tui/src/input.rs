use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use curveplay_core::Key;

/// Translate a terminal key press into an engine key
pub fn map_key(key: KeyEvent) -> Option<Key> {
    match (key.code, key.modifiers) {
        // Ctrl+C quits like Escape
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Key::Escape),
        (KeyCode::Esc, _) => Some(Key::Escape),
        (KeyCode::Tab, _) => Some(Key::Tab),
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Some(Key::Char(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(map_key(key(KeyCode::Esc, KeyModifiers::NONE)), Some(Key::Escape));
        assert_eq!(map_key(key(KeyCode::Tab, KeyModifiers::NONE)), Some(Key::Tab));
        assert_eq!(map_key(key(KeyCode::Char('r'), KeyModifiers::NONE)), Some(Key::Char('r')));
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Key::Escape));
        assert_eq!(map_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(map_key(key(KeyCode::Up, KeyModifiers::NONE)), None);
    }
}
