//! # spark-widgets
//!
//! Terminal widget toolkit: an attributed-text markup compiler, a layout
//! aligner, a widget lifecycle with key bindings and a modal activation
//! loop, and a screen that composes widget surfaces onto a terminal.
//!
//! ## Architecture
//!
//! ```text
//! markup ──► StyledRun ──► widget surfaces ──► Screen::refresh ──► Backend
//!                                 ▲
//! Backend::read_event ──► activate ──► inject ──► bindings / handle_key
//! ```
//!
//! A [`Screen`] owns the backend, every widget surface and the registry of
//! live widgets. Widgets are owned by the application and hold a cheap
//! clone of the screen handle.
//!
//! ## Modules
//!
//! - [`markup`] - `<C></B/24>Title<!B!24>` style markup to styled cells
//! - [`layout`] - screen-relative sizes and placements to rectangles
//! - [`widget`] - the [`Widget`] trait, bindings, activation loop
//! - [`screen`] - surfaces, registry, composition
//! - [`backend`] - crossterm terminal and in-memory test backend
//! - [`widgets`] - [`Histogram`], [`Scale`], [`FScale`]
//!
//! ## Example
//!
//! ```no_run
//! use spark_widgets::backend::CrosstermBackend;
//! use spark_widgets::{ExitState, FScale, FScaleProps, Screen, Widget};
//!
//! # fn main() -> spark_widgets::Result<()> {
//! let screen = Screen::new(CrosstermBackend::new()?)?;
//! let mut scale = FScale::new(&screen, FScaleProps {
//!     title: "<C>Select a value".into(),
//!     label: "</5>Current value".into(),
//!     low: -1.2,
//!     high: 2.4,
//!     start: -1.2,
//!     step: 0.2,
//!     fast_step: 0.4,
//!     digits: 1,
//!     ..Default::default()
//! })?;
//!
//! let selection = scale.activate(&[])?;
//! if scale.exit_state() == ExitState::Normal {
//!     println!("selected {selection:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod markup;
pub mod renderer;
pub mod screen;
pub mod types;
pub mod widget;
pub mod widgets;

// Re-export commonly used items
pub use types::*;

pub use backend::{Backend, CrosstermBackend, TestBackend};
pub use config::{Color, Palette, ScreenConfig};
pub use error::{Result, WidgetError};
pub use input::{InputEvent, Key};
pub use markup::{compile, compile_lines, StyledRun};
pub use renderer::FrameBuffer;
pub use screen::{Screen, WidgetHandle};
pub use widget::{BindingTable, KeyOutcome, Widget, WidgetBase};
pub use widgets::{
    FScale, FScaleProps, Histogram, HistogramProps, Scale, ScaleProps, StatsPosition, ViewType,
};
