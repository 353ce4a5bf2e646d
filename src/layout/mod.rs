//! Layout/alignment engine.
//!
//! Resolves screen-relative sizes and placements into absolute rectangles.
//! Everything here is pure: widgets call [`resolve`] once at construction
//! and again only when they are explicitly moved.
//!
//! Requested sizes follow one convention on both axes:
//!
//! - positive `n`: exactly `n` cells, capped at the container
//! - `0`: the whole container
//! - negative `-n`: the container minus `n` cells
//!
//! Results are never smaller than one cell.

use crate::types::{Justify, Placement, Rect};

// =============================================================================
// Dimensions
// =============================================================================

/// Resolve one requested dimension against its container.
pub fn resolve_dimension(container: u16, requested: i32) -> u16 {
    let container = container.max(1);
    let resolved = match requested {
        0 => container as i32,
        n if n > 0 => n.min(container as i32),
        n => container as i32 + n,
    };
    resolved.clamp(1, container as i32) as u16
}

// =============================================================================
// Positions
// =============================================================================

/// Resolve where a span of `size` cells starts inside `container`.
pub fn resolve_position(container: u16, size: u16, placement: Placement) -> u16 {
    let room = container.saturating_sub(size);
    match placement {
        Placement::Left | Placement::Top => 0,
        Placement::Right | Placement::Bottom => room,
        Placement::Center => room / 2,
        Placement::At(n) => n.clamp(0, room as i32) as u16,
    }
}

/// Resolve a widget's bounds inside a container.
pub fn resolve(
    container_width: u16,
    container_height: u16,
    requested_width: i32,
    requested_height: i32,
    horizontal: Placement,
    vertical: Placement,
) -> Rect {
    let width = resolve_dimension(container_width, requested_width);
    let height = resolve_dimension(container_height, requested_height);
    Rect {
        x: resolve_position(container_width.max(1), width, horizontal),
        y: resolve_position(container_height.max(1), height, vertical),
        width,
        height,
    }
}

// =============================================================================
// Line justification
// =============================================================================

/// Column where a line of `len` cells starts inside a field of `width`.
///
/// A line that does not fit starts at column 0.
pub fn justify(width: u16, len: usize, justify: Justify) -> u16 {
    let Ok(len) = u16::try_from(len) else {
        return 0;
    };
    if len >= width {
        return 0;
    }
    match justify {
        Justify::Left => 0,
        Justify::Right => width - len,
        Justify::Center => (width - len) / 2,
    }
}

// =============================================================================
// Tests
// =============================================================================
