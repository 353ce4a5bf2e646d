//! Markup scanner.
//!
//! Single left-to-right pass turning a markup line into tokens. Tags open
//! with `<` and close at the next `>`:
//!
//! - `<C>` `<L>` `<R>` justification, `<B=text>` bullet, `<I=n>` indent
//!   (only as the very first tag of the line)
//! - `</B/U/24>` attributes/color pair on, `<!B!24>` off
//! - `<#HL(30)>` glyph repeated `n` times, `n` at most 65535
//! - `\<` literal `<`
//!
//! Anything that does not parse stays in the output as literal text, so the
//! scanner is total: every input produces a token stream.

use tracing::debug;

use crate::types::{Attr, Justify};

// =============================================================================
// Types
// =============================================================================

/// One scanned piece of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Justify(Justify),
    Bullet(String),
    Indent(u16),
    StyleOn(Vec<Style>),
    StyleOff(Vec<Style>),
    Glyph { glyph: Glyph, count: u16 },
    Literal(String),
}

/// A single item inside a style toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Attr(Attr),
    /// `N`: back to the base attribute and default color.
    Normal,
    Color(u8),
}

/// Line-drawing and symbol glyphs available through `<#XX>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    HorizontalLine,
    VerticalLine,
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    LeftTee,
    RightTee,
    TopTee,
    BottomTee,
    Plus,
    Diamond,
    Checkerboard,
    Degree,
    PlusMinus,
    Bullet,
    Block,
}

impl Glyph {
    fn from_code(code: &str) -> Option<Self> {
        let glyph = match code {
            "HL" => Self::HorizontalLine,
            "VL" => Self::VerticalLine,
            "UL" => Self::UpperLeft,
            "UR" => Self::UpperRight,
            "LL" => Self::LowerLeft,
            "LR" => Self::LowerRight,
            "LT" => Self::LeftTee,
            "RT" => Self::RightTee,
            "TT" => Self::TopTee,
            "BT" => Self::BottomTee,
            "PL" => Self::Plus,
            "DI" => Self::Diamond,
            "CB" => Self::Checkerboard,
            "DG" => Self::Degree,
            "PM" => Self::PlusMinus,
            "BU" => Self::Bullet,
            "BK" => Self::Block,
            _ => return None,
        };
        Some(glyph)
    }

    /// The character drawn for this glyph.
    pub const fn char(&self) -> char {
        match self {
            Self::HorizontalLine => '─',
            Self::VerticalLine => '│',
            Self::UpperLeft => '┌',
            Self::UpperRight => '┐',
            Self::LowerLeft => '└',
            Self::LowerRight => '┘',
            Self::LeftTee => '├',
            Self::RightTee => '┤',
            Self::TopTee => '┬',
            Self::BottomTee => '┴',
            Self::Plus => '┼',
            Self::Diamond => '◆',
            Self::Checkerboard => '▒',
            Self::Degree => '°',
            Self::PlusMinus => '±',
            Self::Bullet => '·',
            Self::Block => '█',
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Scan one line of markup into tokens.
pub fn scan(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < line.len() {
        let rest = &line[i..];

        if rest.starts_with("\\<") {
            literal.push('<');
            i += 2;
            continue;
        }

        if rest.starts_with('<') {
            // Body runs to the next '>', unless another '<' comes first.
            let close = rest[1..].find(['<', '>']).map(|end| end + 1);
            if let Some(close) = close.filter(|&close| rest.as_bytes()[close] == b'>') {
                let body = &rest[1..close];
                let tag = if i == 0 {
                    parse_leading(body).or_else(|| parse_inline(body))
                } else {
                    parse_inline(body)
                };

                match tag {
                    Some(token) => {
                        if !literal.is_empty() {
                            tokens.push(Token::Literal(std::mem::take(&mut literal)));
                        }
                        tokens.push(token);
                    }
                    None => {
                        debug!(tag = body, "unrecognized markup tag, keeping it as text");
                        literal.push_str(&rest[..=close]);
                    }
                }
                i += close + 1;
                continue;
            }

            if close.is_none() {
                debug!(text = rest, "unterminated markup tag, keeping it as text");
            }
        }

        // Regular content: one character at a time.
        if let Some(ch) = rest.chars().next() {
            literal.push(ch);
            i += ch.len_utf8();
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// Markers only recognized at the very start of a line.
fn parse_leading(body: &str) -> Option<Token> {
    match body {
        "C" => return Some(Token::Justify(Justify::Center)),
        "L" => return Some(Token::Justify(Justify::Left)),
        "R" => return Some(Token::Justify(Justify::Right)),
        _ => {}
    }

    if let Some(bullet) = body.strip_prefix("B=") {
        return Some(Token::Bullet(bullet.to_string()));
    }

    let digits = body.strip_prefix("I=")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(Token::Indent)
}

/// Style toggles and glyph directives.
fn parse_inline(body: &str) -> Option<Token> {
    if let Some(list) = body.strip_prefix('/') {
        return parse_styles(list, '/').map(Token::StyleOn);
    }
    if let Some(list) = body.strip_prefix('!') {
        return parse_styles(list, '!').map(Token::StyleOff);
    }
    if let Some(glyph) = body.strip_prefix('#') {
        return parse_glyph(glyph);
    }
    None
}

/// Parse a style list such as `B/U/24`.
///
/// Letters may also run together (`BU`). Any unknown item rejects the
/// whole tag.
fn parse_styles(list: &str, separator: char) -> Option<Vec<Style>> {
    let mut styles = Vec::new();
    let mut number: Option<u32> = None;

    let flush = |number: &mut Option<u32>, styles: &mut Vec<Style>| -> Option<()> {
        if let Some(value) = number.take() {
            styles.push(Style::Color(u8::try_from(value).ok()?));
        }
        Some(())
    };

    for ch in list.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let value = number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?;
            number = Some(value);
            continue;
        }

        flush(&mut number, &mut styles)?;
        if ch == separator {
            continue;
        }

        let style = match ch {
            'B' => Style::Attr(Attr::BOLD),
            'U' => Style::Attr(Attr::UNDERLINE),
            'K' => Style::Attr(Attr::BLINK),
            'R' => Style::Attr(Attr::REVERSE),
            'S' => Style::Attr(Attr::STANDOUT),
            'D' => Style::Attr(Attr::DIM),
            'N' => Style::Normal,
            _ => return None,
        };
        styles.push(style);
    }
    flush(&mut number, &mut styles)?;

    if styles.is_empty() { None } else { Some(styles) }
}

/// Parse `XX` or `XX(n)`.
fn parse_glyph(body: &str) -> Option<Token> {
    let code = body.get(..2)?;
    let glyph = Glyph::from_code(code)?;

    let rest = &body[2..];
    if rest.is_empty() {
        return Some(Token::Glyph { glyph, count: 1 });
    }

    let digits = rest.strip_prefix('(')?.strip_suffix(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Counts past the widest surface do not parse and stay literal
    let count = digits.parse().ok()?;
    Some(Token::Glyph { glyph, count })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(scan("hello"), vec![literal("hello")]);
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_leading_justification() {
        assert_eq!(
            scan("<C>Title"),
            vec![Token::Justify(Justify::Center), literal("Title")]
        );
        assert_eq!(scan("<R>x")[0], Token::Justify(Justify::Right));
    }

    #[test]
    fn test_justification_only_first() {
        assert_eq!(scan("a<C>b"), vec![literal("a<C>b")]);
    }

    #[test]
    fn test_bullet_and_indent() {
        assert_eq!(
            scan("<B=help> text"),
            vec![Token::Bullet("help".to_string()), literal(" text")]
        );
        assert_eq!(scan("<I=4>x"), vec![Token::Indent(4), literal("x")]);
        assert_eq!(scan("<I=x>y"), vec![literal("<I=x>y")]);
    }

    #[test]
    fn test_style_toggles() {
        assert_eq!(
            scan("</B/24>on<!B!24>"),
            vec![
                Token::StyleOn(vec![Style::Attr(Attr::BOLD), Style::Color(24)]),
                literal("on"),
                Token::StyleOff(vec![Style::Attr(Attr::BOLD), Style::Color(24)]),
            ]
        );
    }

    #[test]
    fn test_letters_run_together() {
        assert_eq!(
            scan("</BU>"),
            vec![Token::StyleOn(vec![
                Style::Attr(Attr::BOLD),
                Style::Attr(Attr::UNDERLINE)
            ])]
        );
    }

    #[test]
    fn test_color_out_of_range_is_literal() {
        assert_eq!(scan("</300>x"), vec![literal("</300>x")]);
    }

    #[test]
    fn test_glyph_directives() {
        assert_eq!(
            scan("<#HL(30)>"),
            vec![Token::Glyph { glyph: Glyph::HorizontalLine, count: 30 }]
        );
        assert_eq!(
            scan("<#DI>"),
            vec![Token::Glyph { glyph: Glyph::Diamond, count: 1 }]
        );
        assert_eq!(scan("<#HL(x)>"), vec![literal("<#HL(x)>")]);
        assert_eq!(scan("<#ZZ>"), vec![literal("<#ZZ>")]);
    }

    #[test]
    fn test_repeat_counts_capped() {
        assert_eq!(
            scan("<#HL(65535)>"),
            vec![Token::Glyph { glyph: Glyph::HorizontalLine, count: u16::MAX }]
        );
        assert_eq!(scan("<#HL(65536)>"), vec![literal("<#HL(65536)>")]);
        assert_eq!(
            scan("<#HL(18446744073709551615)>"),
            vec![literal("<#HL(18446744073709551615)>")]
        );
        assert_eq!(scan("<I=70000>x"), vec![literal("<I=70000>x")]);
    }

    #[test]
    fn test_unknown_tag_is_literal() {
        assert_eq!(scan("a<foo>b"), vec![literal("a<foo>b")]);
        assert_eq!(scan("</Q>"), vec![literal("</Q>")]);
    }

    #[test]
    fn test_unterminated_tag() {
        assert_eq!(scan("abc</B"), vec![literal("abc</B")]);
    }

    #[test]
    fn test_stray_open_before_tag() {
        assert_eq!(
            scan("a < b</B>c"),
            vec![
                literal("a < b"),
                Token::StyleOn(vec![Style::Attr(Attr::BOLD)]),
                literal("c"),
            ]
        );
    }

    #[test]
    fn test_escaped_marker() {
        assert_eq!(scan("\\<C>"), vec![literal("<C>")]);
    }
}
