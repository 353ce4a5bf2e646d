//! Cell surfaces - a widget's private drawing area on the screen.

use crate::renderer::FrameBuffer;
use crate::types::{Rect, SurfaceId};

/// A positioned cell buffer owned by the screen.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    x: u16,
    y: u16,
    buffer: FrameBuffer,
}

impl Surface {
    pub(crate) fn new(id: SurfaceId, rect: Rect) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            buffer: FrameBuffer::new(rect.width, rect.height),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Screen-space bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.buffer.width(), self.buffer.height())
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Move without touching content.
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    /// Resize; content is cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(width, height);
    }

    /// Paint this surface onto a screen-sized frame.
    pub(crate) fn compose_onto(&self, frame: &mut FrameBuffer) {
        frame.blit(&self.buffer, self.x as i32, self.y as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyledCell;

    #[test]
    fn test_compose_at_offset() {
        let mut surface = Surface::new(SurfaceId(1), Rect::new(2, 1, 2, 1));
        surface.buffer_mut().fill(StyledCell::plain('x'));

        let mut frame = FrameBuffer::new(5, 3);
        surface.compose_onto(&mut frame);
        assert_eq!(frame.row_text(0), "     ");
        assert_eq!(frame.row_text(1), "  xx ");
    }

    #[test]
    fn test_move_keeps_content() {
        let mut surface = Surface::new(SurfaceId(1), Rect::new(0, 0, 1, 1));
        surface.buffer_mut().set(0, 0, StyledCell::plain('m'));
        surface.move_to(3, 4);
        assert_eq!(surface.rect(), Rect::new(3, 4, 1, 1));
        assert_eq!(surface.buffer().get(0, 0).map(|c| c.ch), Some('m'));
    }
}
