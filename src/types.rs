//! Core types for spark-widgets.
//!
//! These types define the foundation that everything builds on: the styled
//! cell every surface is made of, placement directives for the layout engine,
//! widget identities and the exit-state protocol.

use std::fmt;

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::REVERSE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NORMAL = 0;
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BLINK = 1 << 2;
        const REVERSE = 1 << 3;
        const STANDOUT = 1 << 4;
        const DIM = 1 << 5;
    }
}

// =============================================================================
// StyledCell - The atomic unit of a surface
// =============================================================================

/// One character plus its attributes and color pair.
///
/// Color pair 0 is the terminal default; 1..=64 index the screen palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyledCell {
    pub ch: char,
    pub attr: Attr,
    pub color: u8,
}

impl StyledCell {
    /// A blank cell with default attributes.
    pub const BLANK: Self = Self {
        ch: ' ',
        attr: Attr::NORMAL,
        color: 0,
    };

    /// Marker stored in the cell to the right of a double-width character.
    pub const CONTINUATION: char = '\0';

    pub const fn new(ch: char, attr: Attr, color: u8) -> Self {
        Self { ch, attr, color }
    }

    /// A cell with no attributes and the default color pair.
    pub const fn plain(ch: char) -> Self {
        Self::new(ch, Attr::NORMAL, 0)
    }

    /// A blank cell carries no glyph (attributes are ignored).
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    /// Overlay another cell's attributes and color onto this glyph.
    pub fn blend(self, overlay: StyledCell) -> Self {
        Self {
            ch: self.ch,
            attr: self.attr | overlay.attr,
            color: if overlay.color != 0 { overlay.color } else { self.color },
        }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::BLANK
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Border style used when a widget is boxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// ─ │ ┌ ┐ └ ┘
    #[default]
    Single,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold,
    /// - | + + + +
    Ascii,
}

impl BorderStyle {
    /// Get the border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
            Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
            Self::Rounded => ('─', '│', '╭', '╮', '╯', '╰'),
            Self::Bold => ('━', '┃', '┏', '┓', '┛', '┗'),
            Self::Ascii => ('-', '|', '+', '+', '+', '+'),
        }
    }
}

// =============================================================================
// Placement & Geometry
// =============================================================================

/// Where a widget sits inside its container along one axis.
///
/// `Left`/`Right` are meant for the horizontal axis and `Top`/`Bottom` for
/// the vertical one, but each pair resolves the same on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    /// Absolute column or row, clamped so the widget stays on screen.
    At(i32),
}

/// Line justification requested by a leading markup marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Direction text and bars are drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A resolved rectangle in screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// =============================================================================
// Widget identity & exit protocol
// =============================================================================

/// Widget type tag, used as the first half of a binding key and to group
/// widgets in the screen registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetType {
    Histogram,
    Scale,
    FScale,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Histogram => "histogram",
            Self::Scale => "scale",
            Self::FScale => "fscale",
        };
        f.write_str(name)
    }
}

/// Screen-unique widget id, assigned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u64);

/// Screen-unique surface id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u64);

/// Outcome of a widget's modal activation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitState {
    /// Not activated yet, or activation still running.
    #[default]
    None,
    /// The widget's own terminating key was pressed.
    Normal,
    /// The escape key ended activation.
    EscapeHit,
    /// A handler stopped activation, or input ran out.
    EarlyExit,
}

// =============================================================================
// Tests
// =============================================================================
