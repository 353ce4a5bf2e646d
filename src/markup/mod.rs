//! Attributed-text compiler.
//!
//! Turns a line of markup into a [`StyledRun`]: the styled cells to blit,
//! the display width they occupy, and the justification a leading marker
//! asked for. Compilation is a pure function of the markup and the base
//! attribute.
//!
//! # Example
//!
//! ```
//! use spark_widgets::markup::compile;
//! use spark_widgets::{Attr, Justify};
//!
//! let run = compile("<C></B>Help<!B> <#HL(3)>", Attr::NORMAL);
//! assert_eq!(run.justify(), Justify::Center);
//! assert_eq!(run.text(), "Help ───");
//! assert_eq!(run.width(), 8);
//! assert_eq!(run.cells()[0].attr, Attr::BOLD);
//! ```

pub mod scanner;

pub use scanner::{scan, Glyph, Style, Token};

use crate::renderer::char_width;
use crate::types::{Attr, Justify, StyledCell};

// =============================================================================
// StyledRun
// =============================================================================

/// Compiled output of one markup line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledRun {
    cells: Vec<StyledCell>,
    width: usize,
    justify: Justify,
}

impl StyledRun {
    /// The styled cells, one per emitted character.
    #[inline]
    pub fn cells(&self) -> &[StyledCell] {
        &self.cells
    }

    /// Display width in terminal columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Justification requested by a leading `<C>`, `<L>` or `<R>`.
    #[inline]
    pub fn justify(&self) -> Justify {
        self.justify
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The characters without styling.
    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.ch).collect()
    }

    fn push(&mut self, cell: StyledCell) {
        self.width += char_width(cell.ch);
        self.cells.push(cell);
    }
}

// =============================================================================
// Compiler
// =============================================================================

/// Compile one line of markup.
///
/// Control characters in the text are consumed without producing a cell.
pub fn compile(markup: &str, base: Attr) -> StyledRun {
    let mut run = StyledRun::default();
    let mut attr = base;
    let mut color = 0u8;

    for token in scan(markup) {
        match token {
            Token::Justify(justify) => run.justify = justify,
            Token::Bullet(bullet) => {
                for ch in bullet.chars().filter(|ch| !ch.is_control()) {
                    run.push(StyledCell::new(ch, attr | Attr::BOLD, color));
                }
                run.push(StyledCell::new(' ', attr, color));
            }
            Token::Indent(count) => {
                for _ in 0..count {
                    run.push(StyledCell::new(' ', attr, color));
                }
            }
            Token::StyleOn(styles) => {
                for style in styles {
                    match style {
                        Style::Attr(flag) => attr |= flag,
                        Style::Normal => {
                            attr = base;
                            color = 0;
                        }
                        Style::Color(pair) => color = pair,
                    }
                }
            }
            Token::StyleOff(styles) => {
                for style in styles {
                    match style {
                        Style::Attr(flag) => attr.remove(flag),
                        Style::Normal => {}
                        // Closing a pair that is not active is a no-op.
                        Style::Color(pair) if pair == color => color = 0,
                        Style::Color(_) => {}
                    }
                }
            }
            Token::Glyph { glyph, count } => {
                for _ in 0..count {
                    run.push(StyledCell::new(glyph.char(), attr, color));
                }
            }
            Token::Literal(text) => {
                for ch in text.chars().filter(|ch| !ch.is_control()) {
                    run.push(StyledCell::new(ch, attr, color));
                }
            }
        }
    }

    run
}

/// Compile multi-line markup, one run per `\n`-separated line.
pub fn compile_lines(markup: &str, base: Attr) -> Vec<StyledRun> {
    markup.split('\n').map(|line| compile(line, base)).collect()
}

/// Display width of a markup line once compiled.
pub fn display_width(markup: &str) -> usize {
    compile(markup, Attr::NORMAL).width()
}

// =============================================================================
// Tests
// =============================================================================
