//! Frame differ for fullscreen output.
//!
//! Compares the current frame to the previous one so a backend only writes
//! cells that changed. A missing previous frame, or one of a different size,
//! means every cell is emitted.

use super::buffer::FrameBuffer;
use crate::types::StyledCell;

/// A cell that must be written at (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

/// Tracks the last presented frame and yields changes against it.
#[derive(Debug, Default)]
pub struct FrameDiff {
    previous: Option<FrameBuffer>,
}

impl FrameDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells of `next` that differ from the previous frame.
    ///
    /// Stores `next` as the previous frame for the following call.
    pub fn changes(&mut self, next: &FrameBuffer) -> Vec<CellChange> {
        let width = next.width();
        let height = next.height();
        let mut changes = Vec::new();

        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = next.get(x as i32, y as i32) else {
                    continue;
                };
                if cell.ch == StyledCell::CONTINUATION {
                    continue;
                }
                let changed = match comparable {
                    Some(prev) => prev.get(x as i32, y as i32) != Some(cell),
                    None => true, // No previous or size changed
                };
                if changed {
                    changes.push(CellChange { x, y, cell: *cell });
                }
            }
        }

        self.previous = Some(next.clone());
        changes
    }

    /// Forget the previous frame so the next call emits everything.
    ///
    /// Use this after terminal resize or when the screen is corrupted.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_emits_everything() {
        let mut diff = FrameDiff::new();
        let frame = FrameBuffer::new(3, 2);
        assert_eq!(diff.changes(&frame).len(), 6);
    }

    #[test]
    fn test_only_changed_cells() {
        let mut diff = FrameDiff::new();
        let mut frame = FrameBuffer::new(3, 2);
        diff.changes(&frame);

        frame.set(1, 1, StyledCell::plain('x'));
        let changes = diff.changes(&frame);
        assert_eq!(
            changes,
            vec![CellChange { x: 1, y: 1, cell: StyledCell::plain('x') }]
        );

        assert!(diff.changes(&frame).is_empty());
    }

    #[test]
    fn test_invalidate_and_resize() {
        let mut diff = FrameDiff::new();
        diff.changes(&FrameBuffer::new(2, 2));
        diff.invalidate();
        assert_eq!(diff.changes(&FrameBuffer::new(2, 2)).len(), 4);
        assert_eq!(diff.changes(&FrameBuffer::new(3, 1)).len(), 3);
    }
}
