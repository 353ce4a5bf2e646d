//! Cell buffers and frame diffing.
//!
//! Widgets paint into [`FrameBuffer`]s (their surfaces). The screen composes
//! surfaces into one frame, and a backend turns that frame into terminal
//! output, using [`FrameDiff`] to skip unchanged cells.

pub mod buffer;
pub mod diff;

pub use buffer::{char_width, FrameBuffer};
pub use diff::{CellChange, FrameDiff};
