//! Screen configuration.
//!
//! A [`ScreenConfig`] is handed to [`Screen::with_config`](crate::Screen::with_config)
//! and stays fixed for the screen's lifetime. Its [`Palette`] maps the color
//! pair numbers used in markup (`</24>`) to foreground/background colors.

use crate::input::Key;
use crate::types::BorderStyle;

// =============================================================================
// Colors
// =============================================================================

/// The eight standard ANSI colors, plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Color order used to build the default pair table.
const PAIR_ORDER: [Color; 8] = [
    Color::White,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Black,
];

/// Foreground/background for color pairs 1..=64.
///
/// Pair `n` is foreground `(n - 1) / 8` and background `(n - 1) % 8`, each
/// indexing white, red, green, yellow, blue, magenta, cyan, black. Pair 0
/// and anything out of range is the terminal default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pairs: Vec<(Color, Color)>,
}

impl Palette {
    /// Number of pairs in the default table.
    pub const DEFAULT_PAIRS: usize = 64;

    /// A palette with every pair set to the terminal default.
    pub fn empty() -> Self {
        Self {
            pairs: vec![(Color::Default, Color::Default); Self::DEFAULT_PAIRS],
        }
    }

    /// Colors for a pair number.
    pub fn pair(&self, pair: u8) -> (Color, Color) {
        if pair == 0 {
            return (Color::Default, Color::Default);
        }
        self.pairs
            .get(pair as usize - 1)
            .copied()
            .unwrap_or((Color::Default, Color::Default))
    }

    /// Override one pair. Pair 0 is reserved and ignored.
    pub fn set_pair(&mut self, pair: u8, fg: Color, bg: Color) {
        if pair == 0 {
            return;
        }
        let index = pair as usize - 1;
        if index >= self.pairs.len() {
            self.pairs
                .resize(index + 1, (Color::Default, Color::Default));
        }
        self.pairs[index] = (fg, bg);
    }
}

impl Default for Palette {
    fn default() -> Self {
        let pairs = PAIR_ORDER
            .iter()
            .flat_map(|&fg| PAIR_ORDER.iter().map(move |&bg| (fg, bg)))
            .collect();
        Self { pairs }
    }
}

// =============================================================================
// ScreenConfig
// =============================================================================

/// Settings shared by every widget on a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    pub palette: Palette,
    /// Border drawn around boxed widgets.
    pub border: BorderStyle,
    /// Ends activation with `ExitState::EscapeHit` unless bound.
    pub escape_key: Key,
    /// Redraws the whole screen unless bound.
    pub refresh_key: Key,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            border: BorderStyle::Single,
            escape_key: Key::Escape,
            refresh_key: Key::Ctrl('l'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair_table() {
        let palette = Palette::default();
        assert_eq!(palette.pair(1), (Color::White, Color::White));
        assert_eq!(palette.pair(2), (Color::White, Color::Red));
        assert_eq!(palette.pair(9), (Color::Red, Color::White));
        assert_eq!(palette.pair(24), (Color::Green, Color::Black));
        assert_eq!(palette.pair(64), (Color::Black, Color::Black));
    }

    #[test]
    fn test_out_of_range_pairs_default() {
        let palette = Palette::default();
        assert_eq!(palette.pair(0), (Color::Default, Color::Default));
        assert_eq!(palette.pair(65), (Color::Default, Color::Default));
    }

    #[test]
    fn test_set_pair_grows() {
        let mut palette = Palette::empty();
        palette.set_pair(100, Color::Cyan, Color::Blue);
        assert_eq!(palette.pair(100), (Color::Cyan, Color::Blue));
        palette.set_pair(0, Color::Red, Color::Red);
        assert_eq!(palette.pair(0), (Color::Default, Color::Default));
    }

    #[test]
    fn test_default_config_keys() {
        let config = ScreenConfig::default();
        assert_eq!(config.escape_key, Key::Escape);
        assert_eq!(config.refresh_key, Key::Ctrl('l'));
    }
}
