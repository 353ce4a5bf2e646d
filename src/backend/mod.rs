//! Terminal backends.
//!
//! A backend is the raw character-cell terminal the widgets draw on. The
//! screen asks it for its size, blocks on it for input, and hands it
//! composed frames. Cell surfaces themselves live in the screen, so a backend
//! only ever sees whole frames.
//!
//! - [`CrosstermBackend`]: a real terminal through crossterm
//! - [`TestBackend`]: scripted input and an inspectable last frame

pub mod crossterm;
pub mod test;

pub use self::crossterm::CrosstermBackend;
pub use self::test::TestBackend;

use std::io;

use crate::config::Palette;
use crate::input::InputEvent;
use crate::renderer::FrameBuffer;

/// The capabilities the widget core needs from a terminal.
pub trait Backend {
    /// Current terminal size as (width, height).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Block until the next input event.
    ///
    /// `Ok(None)` means input is closed for good (end of a script, stdin
    /// gone); a backend that can still deliver input must block instead.
    fn read_event(&mut self) -> io::Result<Option<InputEvent>>;

    /// Show a composed frame.
    fn present(&mut self, frame: &FrameBuffer, palette: &Palette) -> io::Result<()>;

    /// Audible or visual bell.
    fn beep(&mut self) -> io::Result<()> {
        Ok(())
    }
}
