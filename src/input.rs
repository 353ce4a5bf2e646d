//! Input events.
//!
//! Keys are the crate's own enum so bindings, preloaded actions and backends
//! all speak the same language. Backends convert their native events into
//! [`InputEvent`].

use std::fmt;

// =============================================================================
// Types
// =============================================================================

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// A control chord, stored lowercase (`Ctrl('l')` is Ctrl-L).
    Ctrl(char),
    Enter,
    Tab,
    BackTab,
    Escape,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// Build a control chord, normalizing the letter to lowercase.
    pub fn ctrl(c: char) -> Self {
        Self::Ctrl(c.to_ascii_lowercase())
    }

    /// Keys a preloaded action string expands to, one per char.
    ///
    /// `'\n'`/`'\r'` map to Enter, `'\t'` to Tab and `'\x1b'` to Escape.
    pub fn from_char(c: char) -> Self {
        match c {
            '\n' | '\r' => Self::Enter,
            '\t' => Self::Tab,
            '\x1b' => Self::Escape,
            '\x08' | '\x7f' => Self::Backspace,
            c if (c as u32) < 0x20 => {
                let b = c as u8;
                if (1..=26).contains(&b) {
                    Self::Ctrl((b + 0x60) as char)
                } else {
                    // NUL and 0x1c..=0x1f: Ctrl-@, Ctrl-\, Ctrl-], Ctrl-^, Ctrl-_
                    Self::Ctrl((b + 0x40) as char)
                }
            }
            c => Self::Char(c),
        }
    }

    /// Expand a string into keys, e.g. for preloaded actions.
    pub fn sequence(s: &str) -> Vec<Key> {
        s.chars().map(Self::from_char).collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "Ctrl-{}", c.to_ascii_uppercase()),
            Self::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Events a backend delivers to the activation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// The terminal changed size (new width, height).
    Resize(u16, u16),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_controls() {
        assert_eq!(Key::from_char('\n'), Key::Enter);
        assert_eq!(Key::from_char('\t'), Key::Tab);
        assert_eq!(Key::from_char('\x1b'), Key::Escape);
        assert_eq!(Key::from_char('\x0c'), Key::Ctrl('l'));
        assert_eq!(Key::from_char('x'), Key::Char('x'));
        assert_eq!(Key::from_char('\x1e'), Key::Ctrl('^'));
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            Key::sequence("ab\n"),
            vec![Key::Char('a'), Key::Char('b'), Key::Enter]
        );
    }

    #[test]
    fn test_ctrl_normalizes_case() {
        assert_eq!(Key::ctrl('L'), Key::Ctrl('l'));
        assert_eq!(Key::ctrl('L').to_string(), "Ctrl-L");
    }
}
