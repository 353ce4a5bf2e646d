//! In-memory backend for tests and headless runs.
//!
//! [`TestBackend`] is a cheap clone handle: hand one clone to the screen and
//! keep another to script input and inspect what was presented.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::Backend;
use crate::config::Palette;
use crate::input::{InputEvent, Key};
use crate::renderer::FrameBuffer;

#[derive(Debug, Default)]
struct TestState {
    width: u16,
    height: u16,
    events: VecDeque<InputEvent>,
    frame: Option<FrameBuffer>,
    presents: usize,
    beeps: usize,
}

/// Scripted input, recorded output.
///
/// Once the scripted events run out, [`Backend::read_event`] reports closed
/// input.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    state: Rc<RefCell<TestState>>,
}

impl TestBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            state: Rc::new(RefCell::new(TestState {
                width,
                height,
                ..TestState::default()
            })),
        }
    }

    /// Builder form of [`push_keys`](Self::push_keys).
    pub fn with_keys(self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.push_keys(keys);
        self
    }

    pub fn push_key(&self, key: Key) {
        self.push_event(InputEvent::Key(key));
    }

    pub fn push_keys(&self, keys: impl IntoIterator<Item = Key>) {
        let mut state = self.state.borrow_mut();
        state.events.extend(keys.into_iter().map(InputEvent::Key));
    }

    pub fn push_event(&self, event: InputEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    /// Change the terminal size and queue the matching resize event.
    pub fn resize(&self, width: u16, height: u16) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
        state.events.push_back(InputEvent::Resize(width, height));
    }

    /// Events not consumed yet.
    pub fn pending(&self) -> usize {
        self.state.borrow().events.len()
    }

    /// The last presented frame.
    pub fn frame(&self) -> Option<FrameBuffer> {
        self.state.borrow().frame.clone()
    }

    /// Text of one row of the last presented frame.
    pub fn row(&self, y: u16) -> String {
        self.state
            .borrow()
            .frame
            .as_ref()
            .map(|frame| frame.row_text(y))
            .unwrap_or_default()
    }

    pub fn present_count(&self) -> usize {
        self.state.borrow().presents
    }

    pub fn beep_count(&self) -> usize {
        self.state.borrow().beeps
    }
}

impl Backend for TestBackend {
    fn size(&self) -> io::Result<(u16, u16)> {
        let state = self.state.borrow();
        Ok((state.width, state.height))
    }

    fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
        Ok(self.state.borrow_mut().events.pop_front())
    }

    fn present(&mut self, frame: &FrameBuffer, _palette: &Palette) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.frame = Some(frame.clone());
        state.presents += 1;
        Ok(())
    }

    fn beep(&mut self) -> io::Result<()> {
        self.state.borrow_mut().beeps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_events_then_closed() {
        let mut backend = TestBackend::new(10, 4).with_keys([Key::Char('a'), Key::Enter]);
        assert_eq!(backend.pending(), 2);
        assert_eq!(
            backend.read_event().unwrap(),
            Some(InputEvent::Key(Key::Char('a')))
        );
        assert_eq!(backend.read_event().unwrap(), Some(InputEvent::Key(Key::Enter)));
        assert_eq!(backend.read_event().unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let observer = TestBackend::new(4, 2);
        let mut backend = observer.clone();

        let mut frame = FrameBuffer::new(4, 2);
        frame.write_text(0, 1, "ok", crate::Attr::NORMAL, 0, crate::Orientation::Horizontal);
        backend.present(&frame, &Palette::default()).unwrap();
        backend.beep().unwrap();

        assert_eq!(observer.present_count(), 1);
        assert_eq!(observer.beep_count(), 1);
        assert_eq!(observer.row(1), "ok  ");
    }

    #[test]
    fn test_resize_updates_size_and_queues_event() {
        let mut backend = TestBackend::new(80, 24);
        backend.resize(40, 10);
        assert_eq!(backend.size().unwrap(), (40, 10));
        assert_eq!(backend.read_event().unwrap(), Some(InputEvent::Resize(40, 10)));
    }
}
