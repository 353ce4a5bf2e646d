//! Crossterm backend.
//!
//! Bridges crossterm's terminal and event APIs to the [`Backend`] trait:
//! raw mode and the alternate screen while alive, blocking key reads
//! converted to [`Key`], and diffed frame output that skips redundant
//! attribute and color changes.

use std::io::{self, Stdout, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{
    Attribute, Color as TermColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, queue, terminal};
use tracing::debug;

use super::Backend;
use crate::config::{Color, Palette};
use crate::input::{InputEvent, Key};
use crate::renderer::{FrameBuffer, FrameDiff};
use crate::types::{Attr, StyledCell};

// =============================================================================
// Backend
// =============================================================================

/// A terminal driven through crossterm.
pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    diff: FrameDiff,
    /// Last (attr, color) written, to skip redundant escape codes.
    pen: Option<(Attr, u8)>,
    /// Whether this backend switched the terminal into raw mode.
    owns_terminal: bool,
}

impl CrosstermBackend<Stdout> {
    /// Take over stdout: raw mode, alternate screen, hidden cursor.
    ///
    /// The terminal is restored when the backend is dropped.
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        debug!("terminal entered raw mode");

        Ok(Self {
            out,
            diff: FrameDiff::new(),
            pen: None,
            owns_terminal: true,
        })
    }
}

impl<W: Write> CrosstermBackend<W> {
    /// Write frames to `out` without touching terminal modes.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            diff: FrameDiff::new(),
            pen: None,
            owns_terminal: false,
        }
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_cell(&mut self, cell: &StyledCell, palette: &Palette) -> io::Result<()> {
        if self.pen != Some((cell.attr, cell.color)) {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            for attribute in attributes(cell.attr) {
                queue!(self.out, SetAttribute(attribute))?;
            }
            let (fg, bg) = palette.pair(cell.color);
            queue!(
                self.out,
                SetForegroundColor(term_color(fg)),
                SetBackgroundColor(term_color(bg))
            )?;
            self.pen = Some((cell.attr, cell.color));
        }
        queue!(self.out, Print(cell.ch))
    }
}

impl<W: Write> Backend for CrosstermBackend<W> {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(key) = convert_key_event(key) {
                        return Ok(Some(InputEvent::Key(key)));
                    }
                }
                Event::Resize(width, height) => {
                    self.diff.invalidate();
                    return Ok(Some(InputEvent::Resize(width, height)));
                }
                _ => {}
            }
        }
    }

    fn present(&mut self, frame: &FrameBuffer, palette: &Palette) -> io::Result<()> {
        // Each frame starts from a known pen state
        self.pen = None;

        let mut cursor_at: Option<(u16, u16)> = None;
        for change in self.diff.changes(frame) {
            if cursor_at != Some((change.x, change.y)) {
                queue!(self.out, cursor::MoveTo(change.x, change.y))?;
            }
            self.write_cell(&change.cell, palette)?;
            let advance = crate::renderer::char_width(change.cell.ch).max(1) as u16;
            cursor_at = Some((change.x.saturating_add(advance), change.y));
        }

        queue!(self.out, SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }

    fn beep(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        if !self.owns_terminal {
            return;
        }
        let _ = crossterm::execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        debug!("terminal restored");
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Convert a crossterm key event into a [`Key`].
///
/// Returns None for keys the widgets have no use for (media keys, lone
/// modifiers).
pub fn convert_key_event(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match event.code {
        KeyCode::Char(c) if ctrl => Key::ctrl(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

fn attributes(attr: Attr) -> Vec<Attribute> {
    let mut out = Vec::new();
    if attr.contains(Attr::BOLD) {
        out.push(Attribute::Bold);
    }
    if attr.contains(Attr::DIM) {
        out.push(Attribute::Dim);
    }
    if attr.contains(Attr::UNDERLINE) {
        out.push(Attribute::Underlined);
    }
    if attr.contains(Attr::BLINK) {
        out.push(Attribute::SlowBlink);
    }
    if attr.intersects(Attr::REVERSE | Attr::STANDOUT) {
        out.push(Attribute::Reverse);
    }
    out
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::White => TermColor::Grey,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_plain_and_ctrl() {
        let plain = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(convert_key_event(plain), Some(Key::Char('a')));

        let ctrl = KeyEvent::new(KeyCode::Char('L'), KeyModifiers::CONTROL);
        assert_eq!(convert_key_event(ctrl), Some(Key::Ctrl('l')));
    }

    #[test]
    fn test_convert_navigation() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(convert_key_event(up), Some(Key::Up));
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(convert_key_event(esc), Some(Key::Escape));
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(convert_key_event(f5), Some(Key::F(5)));
    }

    #[test]
    fn test_convert_ignores_unknown() {
        let caps = KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE);
        assert_eq!(convert_key_event(caps), None);
    }

    #[test]
    fn test_present_writes_text_then_only_changes() {
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        let palette = Palette::default();
        let mut frame = FrameBuffer::new(4, 1);
        frame.write_text(0, 0, "hi", Attr::NORMAL, 0, crate::Orientation::Horizontal);

        backend.present(&frame, &palette).unwrap();
        let first = String::from_utf8_lossy(backend.writer()).into_owned();
        assert!(first.contains('h'));
        assert!(first.contains('i'));

        let before = backend.writer().len();
        backend.present(&frame, &palette).unwrap();
        let second = String::from_utf8_lossy(&backend.writer()[before..]).into_owned();
        assert!(!second.contains('h'));
    }

    #[test]
    fn test_attribute_mapping() {
        assert!(attributes(Attr::NORMAL).is_empty());
        assert_eq!(
            attributes(Attr::BOLD | Attr::STANDOUT),
            vec![Attribute::Bold, Attribute::Reverse]
        );
    }
}
