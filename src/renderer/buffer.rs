//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of StyledCells. Every widget surface and the
//! composed screen frame are FrameBuffers; all drawing operations work on it.
//!
//! # Design Decisions
//!
//! - **Flat storage**: Uses `Vec<StyledCell>` with row-major indexing.
//! - **Signed coordinates**: Drawing calls take `i32` positions and silently
//!   clip, so layout formulas can go negative on tiny widgets without panics.
//! - **Wide characters**: CJK and emoji write a continuation marker into the
//!   cell to their right.

use unicode_width::UnicodeWidthChar;

use crate::markup::StyledRun;
use crate::types::{Attr, BorderStyle, Orientation, StyledCell};

// =============================================================================
// Character width
// =============================================================================

/// Terminal column width of a character (0 for control characters).
#[inline]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of styled cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<StyledCell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![StyledCell::BLANK; size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if signed coordinates land inside the buffer.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Get a cell (None if out of bounds).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&StyledCell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x as u16, y as u16)])
        } else {
            None
        }
    }

    /// Get a mutable cell (None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut StyledCell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x as u16, y as u16);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Raw cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[StyledCell] {
        &self.cells
    }

    /// Set one cell. Returns false if it was clipped.
    pub fn set(&mut self, x: i32, y: i32, cell: StyledCell) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.fill(StyledCell::BLANK);
    }

    /// Overwrite every cell with `cell`.
    pub fn fill(&mut self, cell: StyledCell) {
        for slot in &mut self.cells {
            *slot = cell;
        }
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, StyledCell::BLANK);
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Write plain text, OR-ing `attr` onto each character.
    ///
    /// Vertical text runs downward one character per row. Returns the number
    /// of characters written (clipped ones included in the advance).
    pub fn write_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        attr: Attr,
        color: u8,
        orientation: Orientation,
    ) -> usize {
        let cells: Vec<StyledCell> = text
            .chars()
            .map(|ch| StyledCell::new(ch, attr, color))
            .collect();
        self.write_cells(x, y, &cells, orientation)
    }

    /// Blit a compiled run.
    pub fn draw_run(&mut self, x: i32, y: i32, run: &StyledRun, orientation: Orientation) -> usize {
        self.write_cells(x, y, run.cells(), orientation)
    }

    fn write_cells(
        &mut self,
        x: i32,
        y: i32,
        cells: &[StyledCell],
        orientation: Orientation,
    ) -> usize {
        let mut col = x;
        let mut row = y;

        for cell in cells {
            let width = char_width(cell.ch);
            if width == 0 {
                continue;
            }

            self.set(col, row, *cell);
            match orientation {
                Orientation::Horizontal => {
                    if width == 2 {
                        // Mark next cell as continuation
                        self.set(
                            col + 1,
                            row,
                            StyledCell::new(StyledCell::CONTINUATION, cell.attr, cell.color),
                        );
                    }
                    col += width as i32;
                }
                Orientation::Vertical => row += 1,
            }
        }

        match orientation {
            Orientation::Horizontal => (col - x).max(0) as usize,
            Orientation::Vertical => (row - y).max(0) as usize,
        }
    }

    /// Draw a horizontal line of `length` cells.
    pub fn draw_hline(&mut self, x: i32, y: i32, length: u16, cell: StyledCell) {
        for col in x..x + length as i32 {
            self.set(col, y, cell);
        }
    }

    /// Draw a vertical line of `length` cells.
    pub fn draw_vline(&mut self, x: i32, y: i32, length: u16, cell: StyledCell) {
        for row in y..y + length as i32 {
            self.set(x, row, cell);
        }
    }

    /// Draw a border around the whole buffer.
    pub fn draw_border(&mut self, style: BorderStyle, attr: Attr, color: u8) {
        let (width, height) = (self.width, self.height);
        if width < 2 || height < 2 {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let x2 = width as i32 - 1;
        let y2 = height as i32 - 1;
        let cell = |ch| StyledCell::new(ch, attr, color);

        // Draw horizontal edges
        self.draw_hline(1, 0, width - 2, cell(horiz));
        self.draw_hline(1, y2, width - 2, cell(horiz));

        // Draw vertical edges
        self.draw_vline(0, 1, height - 2, cell(vert));
        self.draw_vline(x2, 1, height - 2, cell(vert));

        // Draw corners
        self.set(0, 0, cell(tl));
        self.set(x2, 0, cell(tr));
        self.set(x2, y2, cell(br));
        self.set(0, y2, cell(bl));
    }

    /// Copy `source` into this buffer with its top-left corner at (x, y).
    pub fn blit(&mut self, source: &FrameBuffer, x: i32, y: i32) {
        for row in 0..source.height as i32 {
            for col in 0..source.width as i32 {
                if let Some(cell) = source.get(col, row) {
                    self.set(x + col, y + row, *cell);
                }
            }
        }
    }

    /// The characters of one row, continuation markers dropped.
    ///
    /// Handy for assertions on rendered output.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .filter(|cell| cell.ch != StyledCell::CONTINUATION)
            .map(|cell| cell.ch)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
