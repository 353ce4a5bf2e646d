//! Error types.
//!
//! Only construction and terminal I/O can fail. Range violations and
//! malformed markup are recovered where they happen.

use std::io;

use thiserror::Error;

use crate::types::WidgetType;

/// Errors surfaced by widget construction and the terminal backend.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The requested bounds resolve below the widget's minimum usable size.
    #[error(
        "{widget} needs at least {min_width}x{min_height} cells but only {width}x{height} fit on screen"
    )]
    TooSmall {
        widget: WidgetType,
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    /// A surface with no area was requested.
    #[error("cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u16, height: u16 },

    /// The terminal backend failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_display() {
        let err = WidgetError::TooSmall {
            widget: WidgetType::Histogram,
            width: 2,
            height: 2,
            min_width: 3,
            min_height: 3,
        };
        assert_eq!(
            err.to_string(),
            "histogram needs at least 3x3 cells but only 2x2 fit on screen"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: WidgetError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, WidgetError::Terminal(_)));
    }
}
